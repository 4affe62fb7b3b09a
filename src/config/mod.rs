//! Configuration system for rhythm-engine.
//!
//! The configuration lives in `rhythm-engine.toml` under
//! `$XDG_CONFIG_HOME/rhythm-engine/` (or the directory passed with
//! `--config`). Every field is optional; a missing file means defaults.
//!
//! ```toml
//! module = "wakeful_breathing"      # wakeful_breathing, sleep_breathing, meditation,
//!                                   # inebriated, emergency_fallback
//! color_interpolation = "bucketed"  # "bucketed" or "linear"
//! update_interval_ms = 100          # Sample cadence for `run` (10-10000) ms
//! latitude = 41.8781                # Enables the local solar fallback layer
//! longitude = -87.6298
//! schedule_file = "week.toml"       # Custom week, relative to this directory
//!
//! [prototype]
//! time_acceleration = 60.0          # Simulated seconds per real second (0-3600)
//! mock_weather = true               # Must stay true; no live weather source exists
//!
//! [weather]
//! temperature = 68.0                # °F
//! humidity = 55.0                   # %
//! dewpoint = 50.0                   # °F
//! barometric_pressure = 29.92       # inHg
//! cloud_cover_percentage = 40.0
//! wind_speed = 5.0
//! air_quality_index = 35.0
//! ```
//!
//! Values are validated before defaults are applied; a custom schedule file is
//! loaded and checked as part of loading, so a broken week fails at startup.

pub mod loading;
pub mod validation;

use serde::Deserialize;
use std::time::Duration;

use crate::color::ColorInterpolation;
use crate::common::constants::*;
use crate::model::{EnvironmentalData, Module};
use crate::schedule::{WeeklySchedule, standard_week};

pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// Prototype-mode settings used by `simulate` and the mock weather source.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct PrototypeConfig {
    /// Simulated seconds per real second; 0 fast-forwards.
    pub time_acceleration: Option<f64>,
    /// Feed the `[weather]` snapshot. Must be true; there is no live source.
    pub mock_weather: Option<bool>,
}

/// Fixed weather snapshot for prototype runs.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct WeatherConfig {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub dewpoint: Option<f64>,
    pub barometric_pressure: Option<f64>,
    pub cloud_cover_percentage: Option<f64>,
    pub wind_speed: Option<f64>,
    pub air_quality_index: Option<f64>,
}

/// Settings loaded from `rhythm-engine.toml`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Breathing personality to sample.
    pub module: Option<Module>,
    pub color_interpolation: Option<ColorInterpolation>,
    /// Delay between samples in the `run` loop.
    pub update_interval_ms: Option<u64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Path to a custom week, absolute or relative to the config directory.
    pub schedule_file: Option<String>,
    pub prototype: Option<PrototypeConfig>,
    pub weather: Option<WeatherConfig>,

    /// Custom week loaded from `schedule_file`.
    #[serde(skip)]
    pub schedule: Option<WeeklySchedule>,
}

impl Config {
    pub fn module(&self) -> Module {
        self.module.unwrap_or(Module::WakefulBreathing)
    }

    pub fn interpolation(&self) -> ColorInterpolation {
        self.color_interpolation.unwrap_or_default()
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms.unwrap_or(DEFAULT_UPDATE_INTERVAL_MS))
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub fn time_acceleration(&self) -> f64 {
        self.prototype
            .as_ref()
            .and_then(|p| p.time_acceleration)
            .unwrap_or(DEFAULT_TIME_ACCELERATION)
    }

    /// The weather snapshot for prototype runs, with unset fields defaulted.
    pub fn weather_snapshot(&self) -> EnvironmentalData {
        let weather = self.weather.clone().unwrap_or_default();
        EnvironmentalData {
            temperature: weather.temperature.unwrap_or(DEFAULT_MOCK_TEMPERATURE_F),
            humidity: weather.humidity.unwrap_or(DEFAULT_MOCK_HUMIDITY),
            dewpoint: weather.dewpoint.unwrap_or(DEFAULT_MOCK_DEWPOINT_F),
            barometric_pressure: weather
                .barometric_pressure
                .unwrap_or(DEFAULT_MOCK_PRESSURE_INHG),
            cloud_cover_percentage: weather
                .cloud_cover_percentage
                .unwrap_or(DEFAULT_MOCK_CLOUD_COVER),
            wind_speed: weather.wind_speed.unwrap_or(DEFAULT_MOCK_WIND_SPEED),
            air_quality_index: weather.air_quality_index.unwrap_or(DEFAULT_MOCK_AIR_QUALITY),
        }
    }

    /// The week in effect: the custom schedule if one was loaded, otherwise
    /// the standard week.
    pub fn week(&self) -> &WeeklySchedule {
        self.schedule.as_ref().unwrap_or_else(|| standard_week())
    }

    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");
        log_indented!("Module: {}", self.module());
        log_indented!("Color interpolation: {}", self.interpolation().as_str());
        log_indented!("Update interval: {} ms", self.update_interval().as_millis());
        match self.coordinates() {
            Some((lat, lon)) => log_indented!("Location: {lat:.4}°, {lon:.4}°"),
            None => log_indented!("Location: not set (local solar layer disabled)"),
        }
        match &self.schedule_file {
            Some(file) => log_indented!("Schedule: {file}"),
            None => log_indented!("Schedule: standard week"),
        }
        log_indented!("Time acceleration: {}x", self.time_acceleration());
        let weather = self.weather_snapshot();
        log_indented!(
            "Mock weather: {:.0}°F, dewpoint {:.0}°F, {:.2} inHg, {:.0}% cloud",
            weather.temperature,
            weather.dewpoint,
            weather.barometric_pressure,
            weather.cloud_cover_percentage
        );
    }
}

#[cfg(test)]
mod tests;
