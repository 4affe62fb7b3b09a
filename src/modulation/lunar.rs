//! Lunar modulation: breathing rate from lunar distance, and the green-flash
//! temperature shift that walks module baselines through the lunar cycle.

use crate::common::constants::*;
use crate::common::utils::ramp;
use crate::model::{AstronomicalData, Module};

/// Lunar distance normalized to [0, 1]: 0 at apogee, 1 at perigee.
///
/// Distances outside the apogee/perigee band are clamped.
pub fn lunar_proximity(lunar_distance_km: f64) -> f64 {
    if lunar_distance_km.is_nan() {
        return 0.5;
    }
    ramp(lunar_distance_km, LUNAR_APOGEE_KM, LUNAR_PERIGEE_KM)
}

/// Breaths per minute in [10, 12]; a closer moon breathes faster.
pub fn breathing_rate(astronomy: &AstronomicalData) -> f64 {
    breathing_rate_for_distance(astronomy.lunar_distance_km)
}

pub fn breathing_rate_for_distance(lunar_distance_km: f64) -> f64 {
    MIN_BREATHING_RATE_BPM
        + (MAX_BREATHING_RATE_BPM - MIN_BREATHING_RATE_BPM) * lunar_proximity(lunar_distance_km)
}

/// Green-flash shifts since the last new moon, on a standardized 28-shift cycle.
pub fn lunar_shifts_since_new_moon(moon_age_days: f64) -> u32 {
    if !moon_age_days.is_finite() {
        return 0;
    }
    let age = moon_age_days.rem_euclid(SYNODIC_MONTH_DAYS);
    let shifts = (age / SYNODIC_MONTH_DAYS * f64::from(LUNAR_SHIFTS_PER_CYCLE)).round() as u32;
    shifts.min(LUNAR_SHIFTS_PER_CYCLE)
}

/// Midpoint-centered temperature offset in [-42, +42] K.
///
/// Waxing climbs 6 K per shift from -42 K at new moon to +42 K at full moon;
/// waning mirrors it back down.
pub fn lunar_temperature_offset(moon_age_days: f64) -> f64 {
    let shifts = lunar_shifts_since_new_moon(moon_age_days);
    let half_cycle = LUNAR_SHIFTS_PER_CYCLE / 2;
    let climbed = if shifts <= half_cycle {
        shifts
    } else {
        LUNAR_SHIFTS_PER_CYCLE - shifts
    };
    f64::from(climbed) * LUNAR_SHIFT_INCREMENT_K - LUNAR_MAX_SWING_K / 2.0
}

/// Baseline (new-moon) temperature of a module.
pub fn module_base_temperature(module: Module) -> f64 {
    match module {
        Module::WakefulBreathing => WAKEFUL_BASE_K,
        Module::SleepBreathing => SLEEP_BASE_K,
        Module::Meditation => MEDITATION_BASE_K,
        Module::Inebriated => INEBRIATED_BASE_K,
        Module::EmergencyFallback => EMERGENCY_BASE_K,
    }
}

/// Module baseline shifted by the lunar offset. The emergency module stays
/// constant.
pub fn module_temperature(module: Module, moon_age_days: f64) -> f64 {
    let base = module_base_temperature(module);
    if module.bypasses_modulation() {
        return base;
    }
    base + lunar_temperature_offset(moon_age_days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_at_apsides() {
        assert_eq!(breathing_rate_for_distance(LUNAR_APOGEE_KM), 10.0);
        assert_eq!(breathing_rate_for_distance(LUNAR_PERIGEE_KM), 12.0);
        let mid = (LUNAR_APOGEE_KM + LUNAR_PERIGEE_KM) / 2.0;
        assert!((breathing_rate_for_distance(mid) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_clamps_out_of_band_distances() {
        assert_eq!(breathing_rate_for_distance(500_000.0), 10.0);
        assert_eq!(breathing_rate_for_distance(300_000.0), 12.0);
        assert_eq!(breathing_rate_for_distance(0.0), 12.0);
        assert_eq!(breathing_rate_for_distance(f64::NAN), 11.0);
    }

    #[test]
    fn test_closer_moon_breathes_faster() {
        assert!(breathing_rate_for_distance(360_000.0) > breathing_rate_for_distance(400_000.0));
    }

    #[test]
    fn test_lunar_offset_is_midpoint_centered() {
        assert_eq!(lunar_temperature_offset(0.0), -42.0);
        assert_eq!(lunar_temperature_offset(SYNODIC_MONTH_DAYS / 2.0), 42.0);
        assert_eq!(lunar_temperature_offset(SYNODIC_MONTH_DAYS * 0.999), -42.0);
        // First quarter: 7 shifts
        assert_eq!(lunar_temperature_offset(SYNODIC_MONTH_DAYS / 4.0), 0.0);
    }

    #[test]
    fn test_emergency_module_ignores_moon() {
        assert_eq!(module_temperature(Module::EmergencyFallback, 14.0), 2200.0);
        assert_eq!(module_temperature(Module::SleepBreathing, 0.0), 1958.0);
    }
}
