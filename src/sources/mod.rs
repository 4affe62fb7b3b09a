//! Collaborators that feed the engine: weather, astronomy, the last-known
//! astronomy cache and the emergency breathing pattern.
//!
//! Each seam is a trait so the fallback cascade and the CLI can be wired with
//! real providers, the bundled local/mock implementations, or test doubles.
//! Network retrieval and persistent storage live outside this crate.

pub mod cache;
pub mod local;
pub mod weather;

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::f64::consts::TAU;

use crate::color::WARM_AMBER;
use crate::common::constants::{EMERGENCY_BASE_K, MID_BREATHING_RATE_BPM};
use crate::environment::EnvironmentalEffects;
use crate::rhythm::shape_output;
use crate::model::{AstronomicalData, EnvironmentalData, RhythmSample};

pub use cache::MemoryCache;
pub use local::LocalSolarCalculator;
pub use weather::MockWeather;

/// Supplies the current weather snapshot.
#[cfg_attr(test, mockall::automock)]
pub trait WeatherSource: Send + Sync {
    fn current(&self) -> Result<EnvironmentalData>;
}

/// Supplies today's astronomy, either from a remote API or computed locally.
#[cfg_attr(test, mockall::automock)]
pub trait AstronomySource: Send + Sync {
    fn fetch(&self) -> Result<AstronomicalData>;
}

/// Holds the most recent astronomy that was successfully resolved.
#[cfg_attr(test, mockall::automock)]
pub trait AstronomyCache: Send + Sync {
    fn load(&self) -> Result<AstronomicalData>;
    fn store(&self, data: &AstronomicalData) -> Result<()>;
}

/// Last resort before the terminal sample: a fixed breathing pattern that needs
/// no astronomy at all.
#[cfg_attr(test, mockall::automock)]
pub trait EmergencyPattern: Send + Sync {
    fn activate(&self, now: DateTime<Utc>) -> Result<RhythmSample>;
}

/// Priority-99 emergency breathing: the emergency module at its fixed
/// mid-range rate, phased from the wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct Priority99Breathing;

impl EmergencyPattern for Priority99Breathing {
    fn activate(&self, now: DateTime<Utc>) -> Result<RhythmSample> {
        let seconds = now.timestamp_millis() as f64 / 1000.0;
        let phase = (seconds * MID_BREATHING_RATE_BPM / 60.0 * TAU).rem_euclid(TAU);
        let effects = EnvironmentalEffects::neutral();
        let (rgb, brightness) = shape_output(WARM_AMBER, phase.sin(), false, &effects);

        Ok(RhythmSample {
            rgb,
            brightness,
            temperature_k: EMERGENCY_BASE_K,
            effects,
            breathing_rate_bpm: MID_BREATHING_RATE_BPM,
            day_description: "Priority 99 emergency breathing".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_priority99_breathing_is_warm_amber_at_mid_rate() {
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
        let sample = Priority99Breathing.activate(now).unwrap();
        assert_eq!(sample.rgb, WARM_AMBER);
        assert_eq!(sample.temperature_k, 2200.0);
        assert_eq!(sample.breathing_rate_bpm, 11.0);
        assert!((0.6..=1.0).contains(&sample.brightness));
    }
}
