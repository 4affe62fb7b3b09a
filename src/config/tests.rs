use super::loading::CONFIG_FILE_NAME;
use super::validation::validate_config;
use super::*;
use crate::common::constants::test_constants::*;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

fn write_config(dir: &std::path::Path, content: &str) -> std::path::PathBuf {
    let path = dir.join(CONFIG_FILE_NAME);
    fs::write(&path, content).unwrap();
    path
}

fn week_toml() -> String {
    let mut content = String::new();
    for day in [
        "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    ] {
        content.push_str(&format!(
            "[{day}]\nmode = \"kelvin\"\ndescription = \"custom {day}\"\n\n\
             [{day}.modules.sleep_breathing]\nexhale = 2000\ninhale = 1500\n\n"
        ));
    }
    content
}

#[test]
#[serial]
fn test_missing_config_file_yields_defaults() {
    let temp_dir = tempdir().unwrap();

    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    let config = load().unwrap();

    unsafe {
        match original {
            Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    assert_eq!(config.module(), Module::WakefulBreathing);
    assert_eq!(config.interpolation(), ColorInterpolation::Bucketed);
    assert_eq!(config.update_interval_ms, Some(DEFAULT_UPDATE_INTERVAL_MS));
    assert_eq!(config.time_acceleration(), DEFAULT_TIME_ACCELERATION);
    assert!(config.coordinates().is_none());
}

#[test]
#[serial]
fn test_config_path_under_xdg_config_home() {
    let temp_dir = tempdir().unwrap();

    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    let path = get_config_path().unwrap();

    unsafe {
        match original {
            Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    if get_custom_config_dir().is_none() {
        assert_eq!(
            path,
            temp_dir.path().join("rhythm-engine").join(CONFIG_FILE_NAME)
        );
    }
}

#[test]
fn test_load_full_config() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(
        temp_dir.path(),
        &format!(
            r#"
module = "meditation"
color_interpolation = "linear"
update_interval_ms = {TEST_UPDATE_INTERVAL_MS}
latitude = {TEST_LATITUDE}
longitude = {TEST_LONGITUDE}

[prototype]
time_acceleration = 120.0
mock_weather = true

[weather]
dewpoint = 80.0
temperature = 91.0
"#
        ),
    );

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.module(), Module::Meditation);
    assert_eq!(config.interpolation(), ColorInterpolation::Linear);
    assert_eq!(
        config.update_interval(),
        Duration::from_millis(TEST_UPDATE_INTERVAL_MS)
    );
    assert_eq!(config.coordinates(), Some((TEST_LATITUDE, TEST_LONGITUDE)));
    assert_eq!(config.time_acceleration(), 120.0);

    let weather = config.weather_snapshot();
    assert_eq!(weather.dewpoint, 80.0);
    assert_eq!(weather.temperature, 91.0);
    // Unset snapshot fields use the prototype defaults
    assert_eq!(weather.barometric_pressure, DEFAULT_MOCK_PRESSURE_INHG);
}

#[test]
fn test_load_from_missing_path_fails() {
    let temp_dir = tempdir().unwrap();
    assert!(load_from_path(&temp_dir.path().join("nope.toml")).is_err());
}

#[test]
fn test_unknown_module_is_a_parse_error() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(temp_dir.path(), "module = \"jogging\"\n");
    assert!(load_from_path(&path).is_err());
}

#[test]
fn test_update_interval_limits() {
    for (interval, ok) in [(9, false), (10, true), (10_000, true), (10_001, false)] {
        let config = Config {
            update_interval_ms: Some(interval),
            ..Default::default()
        };
        assert_eq!(validate_config(&config).is_ok(), ok, "interval {interval}");
    }
}

#[test]
fn test_coordinates_must_be_paired_and_in_range() {
    let half = Config {
        latitude: Some(TEST_LATITUDE),
        ..Default::default()
    };
    assert!(validate_config(&half).is_err());

    let out_of_range = Config {
        latitude: Some(91.0),
        longitude: Some(0.0),
        ..Default::default()
    };
    assert!(validate_config(&out_of_range).is_err());

    let bad_longitude = Config {
        latitude: Some(0.0),
        longitude: Some(-181.0),
        ..Default::default()
    };
    assert!(validate_config(&bad_longitude).is_err());
}

#[test]
fn test_high_latitude_is_capped() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(temp_dir.path(), "latitude = -78.2\nlongitude = 15.6\n");
    let config = load_from_path(&path).unwrap();
    assert_eq!(config.latitude, Some(-65.0));
}

#[test]
fn test_time_acceleration_limits() {
    let too_fast = Config {
        prototype: Some(PrototypeConfig {
            time_acceleration: Some(MAXIMUM_TIME_ACCELERATION + 1.0),
            mock_weather: None,
        }),
        ..Default::default()
    };
    assert!(validate_config(&too_fast).is_err());

    let fast_forward = Config {
        prototype: Some(PrototypeConfig {
            time_acceleration: Some(0.0),
            mock_weather: None,
        }),
        ..Default::default()
    };
    assert!(validate_config(&fast_forward).is_ok());
}

#[test]
fn test_live_weather_request_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(temp_dir.path(), "[prototype]\nmock_weather = false\n");
    let err = load_from_path(&path).unwrap_err();
    assert!(format!("{err:#}").contains("mock_weather"));

    let path = write_config(temp_dir.path(), "[prototype]\nmock_weather = true\n");
    let config = load_from_path(&path).unwrap();
    assert_eq!(config.prototype.unwrap().mock_weather, Some(true));
}

#[test]
fn test_weather_snapshot_validation() {
    let impossible = Config {
        weather: Some(WeatherConfig {
            temperature: Some(60.0),
            dewpoint: Some(70.0),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert!(validate_config(&impossible).is_err());

    let low_pressure = Config {
        weather: Some(WeatherConfig {
            barometric_pressure: Some(20.0),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert!(validate_config(&low_pressure).is_err());

    let humid = Config {
        weather: Some(WeatherConfig {
            humidity: Some(101.0),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert!(validate_config(&humid).is_err());
}

#[test]
fn test_relative_schedule_file_is_loaded() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("week.toml"), week_toml()).unwrap();
    let path = write_config(temp_dir.path(), "schedule_file = \"week.toml\"\n");

    let config = load_from_path(&path).unwrap();
    let monday = config.week().day(chrono::Weekday::Mon);
    assert_eq!(monday.description, "custom monday");
}

#[test]
fn test_broken_schedule_file_fails_load() {
    let temp_dir = tempdir().unwrap();
    let truncated = week_toml().replace("[sunday]", "[someday]");
    fs::write(temp_dir.path().join("week.toml"), truncated).unwrap();
    let path = write_config(temp_dir.path(), "schedule_file = \"week.toml\"\n");

    assert!(load_from_path(&path).is_err());
}

#[test]
fn test_standard_week_without_schedule_file() {
    let config = Config::default();
    assert_eq!(config.week(), standard_week());
}
