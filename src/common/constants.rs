//! Application constants and default values for rhythm-engine.
//!
//! This module contains the photometric anchors, modulation coefficients,
//! configuration defaults, and validation limits used throughout the engine.

// ═══ Photometric Buckets ═══
// Lower bounds (inclusive) of each color-temperature bucket, in Kelvin

pub const BUCKET_DARK_REDDISH_BLACK_K: f64 = 800.0;
pub const BUCKET_DEEP_RED_K: f64 = 1000.0;
pub const BUCKET_ORANGE_RED_K: f64 = 1500.0;
pub const BUCKET_WARM_AMBER_K: f64 = 2000.0;
pub const BUCKET_SOFT_WHITE_K: f64 = 2500.0;
pub const BUCKET_SKY_BLUE_K: f64 = 3000.0;

// ═══ Fixed Output Temperatures ═══

pub const FALLBACK_TEMPERATURE_K: f64 = 2200.0; // warm amber, also the RGB-mode log placeholder

// ═══ Seasonal Modulation ═══

pub const WINTER_SOLSTICE_COEFFICIENT: f64 = 1.34; // +34% breathing window
pub const SUMMER_SOLSTICE_COEFFICIENT: f64 = 0.77; // -23% breathing window
pub const BASE_DURATION_FRACTION: f64 = 0.167; // 16.7% of the period
pub const WINTER_SOLSTICE_MONTH: u32 = 12;
pub const WINTER_SOLSTICE_DAY: u32 = 21;

// ═══ Lunar Modulation ═══

pub const LUNAR_APOGEE_KM: f64 = 406_700.0;
pub const LUNAR_PERIGEE_KM: f64 = 356_500.0;
pub const MIN_BREATHING_RATE_BPM: f64 = 10.0; // moon at apogee
pub const MAX_BREATHING_RATE_BPM: f64 = 12.0; // moon at perigee
pub const MID_BREATHING_RATE_BPM: f64 = 11.0; // emergency and terminal output

pub const LUNAR_SHIFT_INCREMENT_K: f64 = 6.0; // Kelvin per green flash
pub const LUNAR_SHIFTS_PER_CYCLE: u32 = 28;
pub const LUNAR_MAX_SWING_K: f64 = 84.0; // 6K * 14 shifts, centered as ±42K
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588;
pub const ANOMALISTIC_MONTH_DAYS: f64 = 27.554_550;
pub const MEAN_LUNAR_DISTANCE_KM: f64 = 385_000.0;
pub const LUNAR_DISTANCE_SWING_KM: f64 = 20_900.0;

// Module baselines at new moon (Kelvin)
pub const WAKEFUL_BASE_K: f64 = 2600.0;
pub const SLEEP_BASE_K: f64 = 2000.0;
pub const MEDITATION_BASE_K: f64 = 2600.0;
pub const INEBRIATED_BASE_K: f64 = 1950.0;
pub const EMERGENCY_BASE_K: f64 = 2200.0;

// ═══ Environmental Effects ═══

pub const MUGGY_DEWPOINT_START_F: f64 = 56.0;
pub const MUGGY_DEWPOINT_MAX_F: f64 = 75.0;
pub const DRY_DEWPOINT_START_F: f64 = 45.0;
pub const DRY_DEWPOINT_MAX_F: f64 = 20.0;
pub const FLASH_DEWPOINT_F: f64 = 79.0; // circuit overload territory
pub const STANDARD_PRESSURE_INHG: f64 = 29.92;
pub const PRESSURE_NORMALIZATION_INHG: f64 = 2.0;

// ═══ Breath Synthesis ═══

pub const BREATH_BASE_BRIGHTNESS: f64 = 0.8;
pub const BREATH_SWING: f64 = 0.2;
pub const HEARTBEAT_ADDITIVE: f64 = 0.2;
pub const FLASH_SINE_THRESHOLD: f64 = 0.95;
pub const MIN_BRIGHTNESS: f64 = 0.1;
pub const MAX_BRIGHTNESS: f64 = 1.0;
pub const TERMINAL_SINE_PERIOD_DIVISOR: f64 = 4.0; // seconds per radian of the terminal wave

// ═══ Configuration Defaults ═══

pub const DEFAULT_MODULE: &str = "wakeful_breathing";
pub const DEFAULT_COLOR_INTERPOLATION: &str = "bucketed";
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 100;
pub const DEFAULT_TIME_ACCELERATION: f64 = 60.0; // 1 minute per second
pub const DEFAULT_SIMULATION_STEPS: u64 = 20;

// Mock weather snapshot used in prototype mode
pub const DEFAULT_MOCK_TEMPERATURE_F: f64 = 68.0;
pub const DEFAULT_MOCK_HUMIDITY: f64 = 55.0;
pub const DEFAULT_MOCK_DEWPOINT_F: f64 = 50.0;
pub const DEFAULT_MOCK_PRESSURE_INHG: f64 = 29.92;
pub const DEFAULT_MOCK_CLOUD_COVER: f64 = 40.0;
pub const DEFAULT_MOCK_WIND_SPEED: f64 = 5.0;
pub const DEFAULT_MOCK_AIR_QUALITY: f64 = 35.0;

// ═══ Validation Limits ═══

pub const MINIMUM_UPDATE_INTERVAL_MS: u64 = 10;
pub const MAXIMUM_UPDATE_INTERVAL_MS: u64 = 10_000;
pub const MAXIMUM_TIME_ACCELERATION: f64 = 3600.0;
pub const MINIMUM_DEWPOINT_F: f64 = -80.0;
pub const MAXIMUM_DEWPOINT_F: f64 = 95.0;
pub const MINIMUM_PRESSURE_INHG: f64 = 25.0;
pub const MAXIMUM_PRESSURE_INHG: f64 = 33.0;

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1;
