//! Configuration loading functionality.
//!
//! Resolves the config path, parses the TOML, validates it, applies defaults
//! and loads the custom schedule file if one is referenced.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::Config;
use super::validation::validate_config;
use crate::common::constants::*;
use crate::common::utils::private_path;
use crate::schedule::{loading::load_schedule, weekday_name};

pub const CONFIG_FILE_NAME: &str = "rhythm-engine.toml";
const CONFIG_DIR_NAME: &str = "rhythm-engine";

/// Latitude beyond which solar events become unreliable.
const LATITUDE_CAP: f64 = 65.0;

/// Global configuration directory, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for the current process.
/// This can only be called once, typically at startup.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// Get the custom configuration directory if one was set.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Path of `rhythm-engine.toml`, honoring a `--config` override.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration from the default location.
///
/// A missing file is not an error: the defaults are returned instead.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        let mut config = Config::default();
        apply_defaults(&mut config)?;
        return Ok(config);
    }

    load_from_path(&config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            private_path(&config_path)
        )
    })
}

/// Load configuration from a specific path. The file must exist.
pub fn load_from_path(path: &Path) -> Result<Config> {
    if !path.exists() {
        bail!("Configuration file not found at {}", private_path(path));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", private_path(path)))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", private_path(path)))?;

    validate_config(&config)?;
    apply_modifications(&mut config);
    apply_defaults(&mut config)?;
    load_schedule_file(&mut config, path)?;

    Ok(config)
}

/// Apply default values to configuration fields.
fn apply_defaults(config: &mut Config) -> Result<()> {
    if config.module.is_none() {
        config.module = Some(DEFAULT_MODULE.parse()?);
    }
    if config.color_interpolation.is_none() {
        config.color_interpolation = Some(DEFAULT_COLOR_INTERPOLATION.parse()?);
    }
    if config.update_interval_ms.is_none() {
        config.update_interval_ms = Some(DEFAULT_UPDATE_INTERVAL_MS);
    }

    let prototype = config.prototype.get_or_insert_with(Default::default);
    if prototype.time_acceleration.is_none() {
        prototype.time_acceleration = Some(DEFAULT_TIME_ACCELERATION);
    }
    if prototype.mock_weather.is_none() {
        prototype.mock_weather = Some(true);
    }

    Ok(())
}

/// Apply modifications to configuration values (e.g., latitude capping).
fn apply_modifications(config: &mut Config) {
    if let Some(lat) = config.latitude
        && lat.abs() > LATITUDE_CAP
    {
        let hemisphere = if lat >= 0.0 { "N" } else { "S" };
        log_pipe!();
        log_warning!(
            "Latitude capped at {LATITUDE_CAP}°{hemisphere} (config {:.4}°{hemisphere})",
            lat.abs()
        );
        config.latitude = Some(LATITUDE_CAP.copysign(lat));
    }
}

/// Load and audit the custom week referenced by `schedule_file`.
fn load_schedule_file(config: &mut Config, config_path: &Path) -> Result<()> {
    let Some(file) = config.schedule_file.as_deref() else {
        return Ok(());
    };

    let schedule_path = resolve_relative(config_path, file);
    let schedule = load_schedule(&schedule_path)?;

    let missing = schedule.missing_modules();
    if !missing.is_empty() {
        log_pipe!();
        log_warning!("Custom schedule leaves some modules unscheduled (they breathe warm amber):");
        for (weekday, module) in missing {
            log_indented!("{}: {}", weekday_name(weekday), module);
        }
    }

    config.schedule = Some(schedule);
    Ok(())
}

fn resolve_relative(config_path: &Path, file: &str) -> PathBuf {
    let path = PathBuf::from(file);
    if path.is_absolute() {
        return path;
    }
    config_path
        .parent()
        .map(|dir| dir.join(&path))
        .unwrap_or(path)
}
