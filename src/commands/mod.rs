//! Command-line command handlers for rhythm-engine.
//!
//! Every command shares one pipeline: resolve astronomy through the fallback
//! cascade, read the weather, and ask the coordinator for a lockstep sample
//! pair. When the cascade cannot produce astronomy, its emergency or terminal
//! sample drives both tracks instead.

pub mod help;
pub mod run;
pub mod sample;
pub mod simulate;

use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use std::sync::Arc;

use crate::config::Config;
use crate::coordinator::{CoordinatorTiming, TrackCoordinator, should_light};
use crate::fallback::{FallbackCascade, Resolution};
use crate::model::{Module, RhythmSample, TrackType};
use crate::modulation::module_temperature;
use crate::sources::{
    AstronomyCache, LocalSolarCalculator, MemoryCache, MockWeather, Priority99Breathing,
    WeatherSource,
};
use crate::time_source::TimeSource;

/// One frame of output, ready to print or serialize.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub layer: &'static str,
    pub module: Module,
    /// Lunar-shifted module baseline; absent without astronomy.
    pub module_temperature_k: Option<f64>,
    pub indoor: RhythmSample,
    pub outdoor: RhythmSample,
    pub indoor_lit: bool,
    pub outdoor_lit: bool,
    pub timing: Option<CoordinatorTiming>,
}

/// Collaborators wired from the configuration.
pub struct Pipeline {
    pub cascade: FallbackCascade,
    pub weather: Box<dyn WeatherSource>,
}

impl Pipeline {
    pub fn from_config(config: &Config, clock: Arc<dyn TimeSource>) -> Self {
        let cache: Arc<dyn AstronomyCache> = Arc::new(MemoryCache::new());
        let mut cascade = FallbackCascade::new()
            .with_clock(clock.clone())
            .with_cache(cache)
            .with_emergency(Priority99Breathing);

        match config.coordinates() {
            Some((latitude, longitude)) => {
                cascade = cascade.with_local(LocalSolarCalculator::new(latitude, longitude, clock));
            }
            None => {
                log_warning!("No latitude/longitude configured; local solar layer disabled");
            }
        }

        Self {
            cascade,
            weather: Box::new(MockWeather::new(config.weather_snapshot())),
        }
    }

    /// Produce the next frame.
    pub fn next_frame(
        &self,
        coordinator: &mut TrackCoordinator<'_>,
        module: Module,
        now: chrono::DateTime<Local>,
    ) -> Result<FrameReport> {
        let resolution = self.cascade.resolve();
        let layer = resolution.layer().as_str();

        let report = match resolution {
            Resolution::Astronomy { data, .. } => {
                let weather = self.weather.current()?;
                let pair = coordinator.coordinated_sample(&weather, &data, module);
                FrameReport {
                    layer,
                    module,
                    module_temperature_k: Some(module_temperature(module, data.moon_age_days)),
                    indoor: pair.indoor,
                    outdoor: pair.outdoor,
                    indoor_lit: should_light(TrackType::Indoor, now, &data),
                    outdoor_lit: should_light(TrackType::Outdoor, now, &data),
                    timing: Some(pair.timing),
                }
            }
            Resolution::Emergency(sample) | Resolution::Terminal(sample) => FrameReport {
                layer,
                module,
                module_temperature_k: None,
                indoor: sample.clone(),
                outdoor: sample,
                indoor_lit: true,
                outdoor_lit: true,
                timing: None,
            },
        };

        Ok(report)
    }
}

/// Log a frame as a block.
pub fn log_frame(report: &FrameReport) {
    log_block_start!(
        "Frame via {} ({}){}",
        report.layer,
        report.module,
        report
            .module_temperature_k
            .map(|k| format!(", module baseline {k:.0}K"))
            .unwrap_or_default()
    );
    if let Some(timing) = &report.timing {
        log_indented!(
            "Phase {:.3} rad, {:.2} bpm, seasonal x{:.3} (window {:.1}%){}",
            timing.breath_phase,
            timing.breathing_rate_bpm,
            timing.seasonal_coefficient,
            timing.window_fraction * 100.0,
            if timing.heartbeat_active { ", heartbeat" } else { "" }
        );
    }
    for (track, sample, lit) in [
        (TrackType::Indoor, &report.indoor, report.indoor_lit),
        (TrackType::Outdoor, &report.outdoor, report.outdoor_lit),
    ] {
        if lit {
            log_indented!(
                "{:<7} rgb {} brightness {:.3} at {:.0}K",
                track.as_str(),
                sample.rgb,
                sample.brightness,
                sample.temperature_k
            );
        } else {
            log_indented!("{:<7} dark (weekday golden hour)", track.as_str());
        }
    }
    log_indented!("Day: {}", report.indoor.day_description);
    if report.indoor.effects.extreme_humidity_flash {
        log_indented!("Extreme humidity: flash armed at breath extrema");
    }
}
