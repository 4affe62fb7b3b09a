//! Value types shared across the engine.
//!
//! Snapshots coming in from collaborators (`EnvironmentalData`,
//! `AstronomicalData`) and the sample going out (`RhythmSample`) are plain
//! immutable values: a new one is built for every calculation.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::utils::unit;
use crate::environment::EnvironmentalEffects;

/// Weather snapshot supplied once per sample request.
///
/// Temperatures and dewpoint are in °F, pressure in inHg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalData {
    pub temperature: f64,
    pub humidity: f64,
    pub dewpoint: f64,
    pub barometric_pressure: f64,
    pub cloud_cover_percentage: f64,
    pub wind_speed: f64,
    pub air_quality_index: f64,
}

/// Daily astronomical events plus the current lunar state.
///
/// Moonrise and moonset are optional because the moon does not rise or set
/// on every calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstronomicalData {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub solar_noon: DateTime<Utc>,
    pub golden_hour_begin: DateTime<Utc>,
    pub golden_hour_end: DateTime<Utc>,
    pub astronomical_twilight_begin: DateTime<Utc>,
    pub astronomical_twilight_end: DateTime<Utc>,
    pub nautical_twilight_begin: DateTime<Utc>,
    pub nautical_twilight_end: DateTime<Utc>,
    pub civil_twilight_begin: DateTime<Utc>,
    pub civil_twilight_end: DateTime<Utc>,
    pub moonrise: Option<DateTime<Utc>>,
    pub moonset: Option<DateTime<Utc>>,
    pub lunar_illumination_percentage: f64,
    pub moon_altitude: f64,
    pub moon_age_days: f64,
    pub lunar_distance_km: f64,
}

/// Linear RGB triple, each channel in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Build from 8-bit channel values (0-255).
    pub fn from_u8(channels: [u8; 3]) -> Self {
        Self {
            r: f64::from(channels[0]) / 255.0,
            g: f64::from(channels[1]) / 255.0,
            b: f64::from(channels[2]) / 255.0,
        }
    }

    /// Channel-wise linear interpolation toward `other`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        use crate::common::utils::lerp;
        Rgb {
            r: lerp(self.r, other.r, t),
            g: lerp(self.g, other.g, t),
            b: lerp(self.b, other.b, t),
        }
    }

    /// Force every channel into [0, 1].
    pub fn clamped(self) -> Rgb {
        Rgb {
            r: unit(self.r),
            g: unit(self.g),
            b: unit(self.b),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.r, self.g, self.b)
    }
}

/// A named breathing personality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    WakefulBreathing,
    SleepBreathing,
    Meditation,
    Inebriated,
    EmergencyFallback,
}

impl Module {
    pub const ALL: [Module; 5] = [
        Module::WakefulBreathing,
        Module::SleepBreathing,
        Module::Meditation,
        Module::Inebriated,
        Module::EmergencyFallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::WakefulBreathing => "wakeful_breathing",
            Module::SleepBreathing => "sleep_breathing",
            Module::Meditation => "meditation",
            Module::Inebriated => "inebriated",
            Module::EmergencyFallback => "emergency_fallback",
        }
    }

    /// The emergency module ignores the weekday schedule and lunar modulation.
    pub fn bypasses_modulation(&self) -> bool {
        matches!(self, Module::EmergencyFallback)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Module::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown module '{}'. Valid modules: wakeful_breathing, sleep_breathing, meditation, inebriated, emergency_fallback",
                    s
                )
            })
    }
}

/// One of the two physical installations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrackType {
    Indoor,
    Outdoor,
}

impl TrackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackType::Indoor => "INDOOR",
            TrackType::Outdoor => "OUTDOOR",
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthesized output frame.
///
/// Hardware drivers read `rgb` and `brightness`; the audio collaborator reads
/// `breathing_rate_bpm` and `effects.brown_noise_amplitude_factor`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RhythmSample {
    pub rgb: Rgb,
    pub brightness: f64,
    pub temperature_k: f64,
    pub effects: EnvironmentalEffects,
    pub breathing_rate_bpm: f64,
    pub day_description: String,
}

impl RhythmSample {
    pub fn brown_noise_amplitude(&self) -> f64 {
        self.effects.brown_noise_amplitude_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_round_trip_names() {
        for module in Module::ALL {
            assert_eq!(module.as_str().parse::<Module>().unwrap(), module);
        }
        assert!("jazz_hands".parse::<Module>().is_err());
    }

    #[test]
    fn test_module_serde_names_match_display() {
        let json = serde_json::to_string(&Module::WakefulBreathing).unwrap();
        assert_eq!(json, "\"wakeful_breathing\"");
        let json = serde_json::to_string(&Module::EmergencyFallback).unwrap();
        assert_eq!(json, "\"emergency_fallback\"");
    }

    #[test]
    fn test_rgb_from_u8_normalizes() {
        let rgb = Rgb::from_u8([255, 0, 51]);
        assert_eq!(rgb, Rgb::new(1.0, 0.0, 0.2));
    }

    #[test]
    fn test_rgb_clamped() {
        let rgb = Rgb::new(1.4, -0.1, f64::NAN).clamped();
        assert_eq!(rgb, Rgb::new(1.0, 0.0, 0.0));
    }
}
