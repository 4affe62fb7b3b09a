//! Breath/heartbeat synthesis.
//!
//! [`RhythmEngineCore`] turns the day's schedule, the weather, the moon and a
//! caller-supplied breath phase into one [`RhythmSample`]. The engine holds no
//! mutable state; one instance exists per track and can be shared freely once
//! the phase for a cycle is fixed.
//!
//! ## Synthesis order
//!
//! 1. Resolve the day's schedule for this engine's track
//! 2. Derive environmental effects from the weather
//! 3. Color: interpolate RGB endpoints (grey breathing) or Kelvin endpoints
//!    followed by photometric conversion
//! 4. Brightness: sinusoidal breath scaled by depth, plus the heartbeat overlay
//! 5. Extreme-humidity flash near breath extrema
//! 6. Clamp, attach lunar breathing rate and the effects breakdown
//!
//! The breath phase is used as given. Callers supply a continuously increasing
//! or periodic radian value; nothing here unwraps it.

use chrono::NaiveDate;

use crate::color::{ColorInterpolation, FLASH_WHITE, WARM_AMBER};
use crate::common::constants::*;
use crate::environment::{self, EnvironmentalEffects};
use crate::model::{AstronomicalData, EnvironmentalData, Module, Rgb, RhythmSample, TrackType};
use crate::modulation::breathing_rate;
use crate::schedule::{BreathingEndpoints, DailyColorSchedule, WeeklySchedule, standard_week};

/// Stateless synthesizer bound to one track.
#[derive(Debug, Clone)]
pub struct RhythmEngineCore<'a> {
    track: TrackType,
    schedule: &'a WeeklySchedule,
    interpolation: ColorInterpolation,
}

impl RhythmEngineCore<'static> {
    /// Engine over the standard week with bucketed color conversion.
    pub fn new(track: TrackType) -> Self {
        Self::with_schedule(track, standard_week())
    }
}

impl<'a> RhythmEngineCore<'a> {
    pub fn with_schedule(track: TrackType, schedule: &'a WeeklySchedule) -> Self {
        Self {
            track,
            schedule,
            interpolation: ColorInterpolation::default(),
        }
    }

    /// Select how Kelvin values are converted to color.
    pub fn with_interpolation(mut self, interpolation: ColorInterpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// The schedule this engine uses on `date`.
    pub fn day_schedule(&self, date: NaiveDate) -> &'a DailyColorSchedule {
        self.schedule.schedule_for(date, self.track)
    }

    /// Synthesize one output sample.
    pub fn sample(
        &self,
        date: NaiveDate,
        module: Module,
        breath_phase: f64,
        heartbeat_active: bool,
        weather: &EnvironmentalData,
        astronomy: &AstronomicalData,
    ) -> RhythmSample {
        let effects = environment::effects(weather);

        if module.bypasses_modulation() {
            return self.emergency_sample(breath_phase, heartbeat_active, effects);
        }

        let day = self.day_schedule(date);
        let breath_sine = breath_phase.sin();
        let breath_factor = (breath_sine + 1.0) / 2.0;

        let (rgb, temperature_k) = match &day.endpoints {
            BreathingEndpoints::Rgb(pair) => {
                let (exhale, inhale) = pair.normalized();
                // Genuinely color-native; the temperature only feeds logs
                (exhale.lerp(inhale, breath_factor), FALLBACK_TEMPERATURE_K)
            }
            BreathingEndpoints::Kelvin(modules) => match modules.get(&module) {
                Some(pair) => {
                    let kelvin = pair.exhale + (pair.inhale - pair.exhale) * breath_factor;
                    (self.interpolation.convert(kelvin), kelvin)
                }
                None => (WARM_AMBER, FALLBACK_TEMPERATURE_K),
            },
        };

        let (rgb, brightness) = shape_output(rgb, breath_sine, heartbeat_active, &effects);

        RhythmSample {
            rgb,
            brightness,
            temperature_k,
            effects,
            breathing_rate_bpm: breathing_rate(astronomy),
            day_description: day.description.clone(),
        }
    }

    /// Emergency breathing: constant warm amber at 2200 K, mid-range rate,
    /// no schedule or lunar input.
    fn emergency_sample(
        &self,
        breath_phase: f64,
        heartbeat_active: bool,
        effects: EnvironmentalEffects,
    ) -> RhythmSample {
        let (rgb, brightness) =
            shape_output(WARM_AMBER, breath_phase.sin(), heartbeat_active, &effects);
        RhythmSample {
            rgb,
            brightness,
            temperature_k: EMERGENCY_BASE_K,
            effects,
            breathing_rate_bpm: MID_BREATHING_RATE_BPM,
            day_description: "Emergency fallback breathing".to_string(),
        }
    }
}

/// Apply the breath/heartbeat brightness envelope and the humidity flash.
///
/// Returns the final color and brightness, both clamped to their ranges.
pub fn shape_output(
    rgb: Rgb,
    breath_sine: f64,
    heartbeat_active: bool,
    effects: &EnvironmentalEffects,
) -> (Rgb, f64) {
    let mut rgb = rgb;
    let mut breathing_multiplier =
        (BREATH_BASE_BRIGHTNESS + BREATH_SWING * breath_sine) * (1.0 + effects.depth_adjustment);
    let mut heartbeat_additive = if heartbeat_active {
        HEARTBEAT_ADDITIVE
    } else {
        0.0
    };

    // Circuit overload at the breath apex
    if effects.extreme_humidity_flash && breath_sine.abs() > FLASH_SINE_THRESHOLD {
        rgb = FLASH_WHITE;
        breathing_multiplier = 1.0;
        heartbeat_additive = 0.0;
    }

    (rgb.clamped(), clamp_brightness(breathing_multiplier + heartbeat_additive))
}

/// Ceiling at 1.0, floor at 0.1. NaN falls to the floor.
pub fn clamp_brightness(brightness: f64) -> f64 {
    if brightness.is_nan() {
        return MIN_BRIGHTNESS;
    }
    brightness.min(MAX_BRIGHTNESS).max(MIN_BRIGHTNESS)
}
