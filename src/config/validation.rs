//! Configuration validation functionality.
//!
//! Rejects values the engine cannot run with. Runs before defaults are
//! applied, so only fields present in the file are checked.

use anyhow::Result;

use super::{Config, WeatherConfig};
use crate::common::constants::*;

pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(interval_ms) = config.update_interval_ms
        && !(MINIMUM_UPDATE_INTERVAL_MS..=MAXIMUM_UPDATE_INTERVAL_MS).contains(&interval_ms)
    {
        anyhow::bail!(
            "update_interval_ms ({} ms) must be between {} and {} milliseconds",
            interval_ms,
            MINIMUM_UPDATE_INTERVAL_MS,
            MAXIMUM_UPDATE_INTERVAL_MS
        );
    }

    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    if config.latitude.is_some() != config.longitude.is_some() {
        anyhow::bail!("latitude and longitude must be set together");
    }

    if let Some(acceleration) = config.prototype.as_ref().and_then(|p| p.time_acceleration)
        && !(0.0..=MAXIMUM_TIME_ACCELERATION).contains(&acceleration)
    {
        anyhow::bail!(
            "prototype.time_acceleration must be between 0 and {} (got {})",
            MAXIMUM_TIME_ACCELERATION,
            acceleration
        );
    }

    if config.prototype.as_ref().and_then(|p| p.mock_weather) == Some(false) {
        anyhow::bail!(
            "prototype.mock_weather = false is not supported: no live weather source is available"
        );
    }

    if let Some(weather) = &config.weather {
        validate_weather(weather)?;
    }

    Ok(())
}

fn validate_weather(weather: &WeatherConfig) -> Result<()> {
    check_range(
        "weather.dewpoint",
        weather.dewpoint,
        MINIMUM_DEWPOINT_F,
        MAXIMUM_DEWPOINT_F,
    )?;
    check_range(
        "weather.barometric_pressure",
        weather.barometric_pressure,
        MINIMUM_PRESSURE_INHG,
        MAXIMUM_PRESSURE_INHG,
    )?;
    check_range("weather.humidity", weather.humidity, 0.0, 100.0)?;
    check_range(
        "weather.cloud_cover_percentage",
        weather.cloud_cover_percentage,
        0.0,
        100.0,
    )?;

    if let (Some(temperature), Some(dewpoint)) = (weather.temperature, weather.dewpoint)
        && dewpoint > temperature
    {
        anyhow::bail!(
            "weather.dewpoint ({dewpoint}°F) cannot exceed weather.temperature ({temperature}°F)"
        );
    }

    for (name, value) in [
        ("weather.temperature", weather.temperature),
        ("weather.wind_speed", weather.wind_speed),
        ("weather.air_quality_index", weather.air_quality_index),
    ] {
        if let Some(value) = value
            && !value.is_finite()
        {
            anyhow::bail!("{name} must be a finite number (got {value})");
        }
    }

    Ok(())
}

fn check_range(name: &str, value: Option<f64>, min: f64, max: f64) -> Result<()> {
    if let Some(value) = value
        && !(min..=max).contains(&value)
    {
        anyhow::bail!("{name} must be between {min} and {max} (got {value})");
    }
    Ok(())
}
