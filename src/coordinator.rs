//! Dual-track coordination.
//!
//! The indoor and outdoor installations breathe in lockstep: one shared
//! [`PhaseClock`] is advanced per cycle from the time source and both engines
//! sample against that same value. The clock is replaced as a whole on every
//! update, so a sample pair can never observe a half-updated phase.

use chrono::{DateTime, Datelike, Local, Utc, Weekday};
use serde::Serialize;
use std::f64::consts::TAU;
use std::sync::Arc;

use crate::color::ColorInterpolation;
use crate::common::constants::MID_BREATHING_RATE_BPM;
use crate::model::{AstronomicalData, EnvironmentalData, Module, RhythmSample, TrackType};
use crate::modulation::{breathing_rate, seasonal_coefficient, seasonal_duration_fraction};
use crate::rhythm::RhythmEngineCore;
use crate::schedule::WeeklySchedule;
use crate::time_source::{self, TimeSource};

/// Shared breath state for both tracks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhaseClock {
    pub breath_phase: f64,
    pub heartbeat_active: bool,
}

/// Timing metadata for one coordinated cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinatorTiming {
    pub breath_phase: f64,
    pub heartbeat_active: bool,
    pub breathing_rate_bpm: f64,
    pub seasonal_coefficient: f64,
    /// Share of the breathing period taken by the active window.
    pub window_fraction: f64,
    pub computed_at: DateTime<Local>,
}

/// Both track samples from one clock value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinatedSample {
    pub indoor: RhythmSample,
    pub outdoor: RhythmSample,
    pub timing: CoordinatorTiming,
}

pub struct TrackCoordinator<'a> {
    indoor: RhythmEngineCore<'a>,
    outdoor: RhythmEngineCore<'a>,
    clock: PhaseClock,
    time: Arc<dyn TimeSource>,
}

impl TrackCoordinator<'static> {
    /// Coordinator over the standard week, reading the global time source.
    pub fn new() -> Self {
        Self::from_engines(
            RhythmEngineCore::new(TrackType::Indoor),
            RhythmEngineCore::new(TrackType::Outdoor),
            time_source::global(),
        )
    }
}

impl Default for TrackCoordinator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TrackCoordinator<'a> {
    pub fn with_schedule(
        schedule: &'a WeeklySchedule,
        interpolation: ColorInterpolation,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self::from_engines(
            RhythmEngineCore::with_schedule(TrackType::Indoor, schedule)
                .with_interpolation(interpolation),
            RhythmEngineCore::with_schedule(TrackType::Outdoor, schedule)
                .with_interpolation(interpolation),
            time,
        )
    }

    fn from_engines(
        indoor: RhythmEngineCore<'a>,
        outdoor: RhythmEngineCore<'a>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            indoor,
            outdoor,
            clock: PhaseClock::default(),
            time,
        }
    }

    pub fn clock(&self) -> PhaseClock {
        self.clock
    }

    pub fn engine(&self, track: TrackType) -> &RhythmEngineCore<'a> {
        match track {
            TrackType::Indoor => &self.indoor,
            TrackType::Outdoor => &self.outdoor,
        }
    }

    /// Arm or disarm the heartbeat overlay for both tracks.
    pub fn set_heartbeat(&mut self, active: bool) {
        self.clock = PhaseClock {
            heartbeat_active: active,
            ..self.clock
        };
    }

    /// Advance the shared clock from the current time at the lunar rate.
    pub fn update_timing(&mut self, astronomy: &AstronomicalData) -> CoordinatorTiming {
        self.advance_clock(breathing_rate(astronomy))
    }

    fn advance_clock(&mut self, rate_bpm: f64) -> CoordinatorTiming {
        let now = self.time.now();
        let seconds = now.timestamp_millis() as f64 / 1000.0;
        let breath_phase = (seconds * rate_bpm / 60.0 * TAU).rem_euclid(TAU);

        self.clock = PhaseClock {
            breath_phase,
            heartbeat_active: self.clock.heartbeat_active,
        };

        CoordinatorTiming {
            breath_phase,
            heartbeat_active: self.clock.heartbeat_active,
            breathing_rate_bpm: rate_bpm,
            seasonal_coefficient: seasonal_coefficient(now.date_naive()),
            window_fraction: seasonal_duration_fraction(now.date_naive()),
            computed_at: now,
        }
    }

    /// Update the clock once and sample both tracks against it.
    pub fn coordinated_sample(
        &mut self,
        weather: &EnvironmentalData,
        astronomy: &AstronomicalData,
        module: Module,
    ) -> CoordinatedSample {
        // Emergency breathing reports a fixed rate, so its phase follows it
        let timing = if module.bypasses_modulation() {
            self.advance_clock(MID_BREATHING_RATE_BPM)
        } else {
            self.update_timing(astronomy)
        };
        let date = timing.computed_at.date_naive();
        let PhaseClock {
            breath_phase,
            heartbeat_active,
        } = self.clock;

        let indoor = self.indoor.sample(
            date,
            module,
            breath_phase,
            heartbeat_active,
            weather,
            astronomy,
        );
        let outdoor = self.outdoor.sample(
            date,
            module,
            breath_phase,
            heartbeat_active,
            weather,
            astronomy,
        );

        CoordinatedSample {
            indoor,
            outdoor,
            timing,
        }
    }
}

/// Whether a track should be lit at `time`.
///
/// Indoor is always lit. Outdoor is always lit on weekends and dark during the
/// golden hour on weekdays.
pub fn should_light(track: TrackType, time: DateTime<Local>, astronomy: &AstronomicalData) -> bool {
    match track {
        TrackType::Indoor => true,
        TrackType::Outdoor => {
            if matches!(time.weekday(), Weekday::Sat | Weekday::Sun) {
                return true;
            }
            let utc = time.with_timezone(&Utc);
            !(astronomy.golden_hour_begin <= utc && utc < astronomy.golden_hour_end)
        }
    }
}
