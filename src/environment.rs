//! Weather-driven breathing modifiers.
//!
//! Dewpoint drives two independent factors: a "muggy" factor for humid air and
//! a "dryness" factor for crisp air. Their domains do not overlap in practice
//! but they are computed separately and never coupled. Barometric pressure and
//! cloud cover feed the depth and saturation adjustments.

use serde::Serialize;

use crate::common::constants::*;
use crate::common::utils::ramp;
use crate::model::EnvironmentalData;

/// Breakdown of every weather-derived modifier for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvironmentalEffects {
    pub muggy_factor: f64,
    pub dryness_factor: f64,
    pub pressure_factor: f64,
    pub cloud_factor: f64,
    /// Relative change in breathing depth, applied as `(1 + depth)` to brightness.
    pub depth_adjustment: f64,
    pub saturation_adjustment: f64,
    pub effort_multiplier: f64,
    /// Dewpoint at or above 79°F arms the circuit-overload flash.
    pub extreme_humidity_flash: bool,
    /// Scale for the external brown-noise generator.
    pub brown_noise_amplitude_factor: f64,
}

impl EnvironmentalEffects {
    /// Effects for calm, standard conditions: nothing adjusted.
    pub const fn neutral() -> Self {
        Self {
            muggy_factor: 0.0,
            dryness_factor: 0.0,
            pressure_factor: 0.0,
            cloud_factor: 0.0,
            depth_adjustment: 0.0,
            saturation_adjustment: 0.0,
            effort_multiplier: 1.0,
            extreme_humidity_flash: false,
            brown_noise_amplitude_factor: 1.0,
        }
    }
}

impl Default for EnvironmentalEffects {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Muggy discomfort: 0 below 56°F dewpoint, 1 above 75°F, linear between.
pub fn muggy_factor(dewpoint_f: f64) -> f64 {
    ramp(dewpoint_f, MUGGY_DEWPOINT_START_F, MUGGY_DEWPOINT_MAX_F)
}

/// Crisp-air effect: 0 above 45°F dewpoint, 1 below 20°F, linear between.
pub fn dryness_factor(dewpoint_f: f64) -> f64 {
    ramp(dewpoint_f, DRY_DEWPOINT_START_F, DRY_DEWPOINT_MAX_F)
}

/// Signed deviation from standard pressure, normalized by 2 inHg.
pub fn pressure_factor(pressure_inhg: f64) -> f64 {
    (pressure_inhg - STANDARD_PRESSURE_INHG) / PRESSURE_NORMALIZATION_INHG
}

/// Derive all modifiers from a weather snapshot.
pub fn effects(weather: &EnvironmentalData) -> EnvironmentalEffects {
    let muggy = muggy_factor(weather.dewpoint);
    let dryness = dryness_factor(weather.dewpoint);
    let pressure = pressure_factor(weather.barometric_pressure);
    let cloud = weather.cloud_cover_percentage / 100.0;

    // Dry air breathes deeper, humid air shallower
    let depth_adjustment = pressure * 0.1 + dryness * 0.1 - muggy * 0.1;
    let saturation_adjustment = muggy * 0.2 - dryness * 0.15 + cloud * 0.1;
    let effort_multiplier = 1.0 + muggy * 0.15;

    EnvironmentalEffects {
        muggy_factor: muggy,
        dryness_factor: dryness,
        pressure_factor: pressure,
        cloud_factor: cloud,
        depth_adjustment,
        saturation_adjustment,
        effort_multiplier,
        extreme_humidity_flash: weather.dewpoint >= FLASH_DEWPOINT_F,
        brown_noise_amplitude_factor: 1.0 + depth_adjustment,
    }
}
