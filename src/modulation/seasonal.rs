//! Seasonal breathing-window coefficient.
//!
//! The winter solstice is approximated as 21 December; precise solstice
//! computation belongs to an astronomy library, not this engine.

use chrono::{Datelike, NaiveDate};

use crate::common::constants::*;

/// Most recent winter solstice on or before `date`.
fn previous_winter_solstice(date: NaiveDate) -> NaiveDate {
    let this_year = solstice_in(date.year());
    if date >= this_year {
        this_year
    } else {
        solstice_in(date.year() - 1)
    }
}

fn solstice_in(year: i32) -> NaiveDate {
    // 21 December exists in every proleptic Gregorian year chrono supports
    NaiveDate::from_ymd_opt(year, WINTER_SOLSTICE_MONTH, WINTER_SOLSTICE_DAY)
        .unwrap_or(NaiveDate::MIN)
}

/// Days elapsed since the most recent winter solstice and the length of the
/// solstice-to-solstice cycle containing `date` (365 or 366).
pub fn days_since_winter_solstice(date: NaiveDate) -> (i64, i64) {
    let previous = previous_winter_solstice(date);
    let next = solstice_in(previous.year() + 1);
    let elapsed = date.signed_duration_since(previous).num_days();
    let cycle = next.signed_duration_since(previous).num_days();
    (elapsed, cycle)
}

/// Breathing duration coefficient in [0.77, 1.34].
///
/// 1.34 at the winter solstice, 0.77 half a cycle later, linear in between.
/// The triangle shape keeps the curve continuous across the solstice.
pub fn seasonal_coefficient(date: NaiveDate) -> f64 {
    let (elapsed, cycle) = days_since_winter_solstice(date);
    let fraction = elapsed as f64 / cycle as f64;
    let toward_summer = 1.0 - (1.0 - 2.0 * fraction).abs();

    let coefficient = WINTER_SOLSTICE_COEFFICIENT
        + (SUMMER_SOLSTICE_COEFFICIENT - WINTER_SOLSTICE_COEFFICIENT) * toward_summer;
    coefficient.clamp(SUMMER_SOLSTICE_COEFFICIENT, WINTER_SOLSTICE_COEFFICIENT)
}

/// Share of the breathing period occupied by the active window.
pub fn seasonal_duration_fraction(date: NaiveDate) -> f64 {
    BASE_DURATION_FRACTION * seasonal_coefficient(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_winter_solstice_is_maximum() {
        assert_eq!(seasonal_coefficient(date(2024, 12, 21)), 1.34);
        assert_eq!(days_since_winter_solstice(date(2024, 12, 21)), (0, 365));
    }

    #[test]
    fn test_cycle_length_tracks_leap_years() {
        // 2023-12-21 .. 2024-12-21 spans 29 February
        assert_eq!(days_since_winter_solstice(date(2024, 3, 1)).1, 366);
        assert_eq!(days_since_winter_solstice(date(2025, 3, 1)).1, 365);
    }

    #[test]
    fn test_dates_before_solstice_use_previous_year() {
        let (elapsed, _) = days_since_winter_solstice(date(2025, 1, 1));
        assert_eq!(elapsed, 11);
        let (elapsed, _) = days_since_winter_solstice(date(2025, 12, 20));
        assert_eq!(elapsed, 364);
    }

    #[test]
    fn test_midsummer_approaches_minimum() {
        let coefficient = seasonal_coefficient(date(2025, 6, 21));
        assert!(coefficient < 0.78, "got {coefficient}");
        assert!(coefficient >= 0.77);
    }

    #[test]
    fn test_continuous_across_solstice() {
        let before = seasonal_coefficient(date(2025, 12, 20));
        let on = seasonal_coefficient(date(2025, 12, 21));
        let after = seasonal_coefficient(date(2025, 12, 22));
        let daily_step = 2.0 * (1.34 - 0.77) / 365.0;
        assert!((on - before).abs() <= daily_step + 1e-9);
        assert!((after - on).abs() <= daily_step + 1e-9);
    }

    #[test]
    fn test_duration_fraction_scales_base() {
        let fraction = seasonal_duration_fraction(date(2024, 12, 21));
        assert!((fraction - 0.167 * 1.34).abs() < 1e-12);
    }
}
