//! # rhythm-engine
//!
//! Computes the color, brightness and breathing cadence of an ambient light
//! installation from the day of the week, the moon, the season and the
//! weather.
//!
//! ## Architecture
//!
//! Leaf-first:
//!
//! - **`color`**: photometric conversion from Kelvin to RGB
//! - **`schedule`**: the weekly color personalities, standard or loaded from TOML
//! - **`modulation`**: seasonal breathing window and lunar breathing rate/shift
//! - **`environment`**: weather-derived modifiers (muggy, dry, pressure, flash)
//! - **`rhythm`**: the stateless breath/heartbeat synthesizer
//! - **`fallback`**: the resilience cascade for astronomical input
//! - **`coordinator`**: keeps the indoor and outdoor tracks phase-locked
//! - **`sources`**: collaborator traits plus local solar, cache and mock weather
//! - **Infrastructure**: `config`, `time_source`, `signals`, `logger`, `args`,
//!   `commands`

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod color;
pub mod commands;
pub mod common;
pub mod config;
pub mod coordinator;
pub mod environment;
pub mod fallback;
pub mod model;
pub mod modulation;
pub mod rhythm;
pub mod schedule;
pub mod signals;
pub mod sources;
pub mod time_source;

pub use coordinator::{CoordinatedSample, TrackCoordinator};
pub use fallback::{FallbackCascade, Resolution};
pub use model::{AstronomicalData, EnvironmentalData, Module, RhythmSample, TrackType};
pub use rhythm::RhythmEngineCore;
