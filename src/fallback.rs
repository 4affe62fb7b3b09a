//! Resilience cascade for astronomical input.
//!
//! Layers are tried strictly in order, each at most once:
//!
//! 1. Remote API
//! 2. Local solar calculation
//! 3. Last-known cache
//! 4. Priority-99 emergency breathing
//! 5. Terminal sample (cannot fail)
//!
//! Every layer is optional. A failing layer is logged and skipped; the first
//! success wins and the [`Resolution`] names the layer that produced it. API
//! and local results are written back to the cache so a later outage can
//! still serve the most recent real data.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use crate::color::WARM_AMBER;
use crate::common::constants::*;
use crate::environment::EnvironmentalEffects;
use crate::model::{AstronomicalData, RhythmSample};
use crate::sources::{AstronomyCache, AstronomySource, EmergencyPattern};
use crate::time_source::{self, TimeSource};

/// The layer a resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackLayer {
    Api,
    LocalCalculation,
    Cache,
    EmergencyBreathing,
    Terminal,
}

impl FallbackLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackLayer::Api => "api",
            FallbackLayer::LocalCalculation => "local_calculations",
            FallbackLayer::Cache => "cached_data",
            FallbackLayer::EmergencyBreathing => "priority_99_breathing",
            FallbackLayer::Terminal => "absolute_fallback",
        }
    }
}

impl fmt::Display for FallbackLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of walking the cascade.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Real astronomy from the API, local calculation or cache.
    Astronomy {
        layer: FallbackLayer,
        data: AstronomicalData,
    },
    /// The emergency pattern produced a finished sample.
    Emergency(RhythmSample),
    /// Nothing else worked.
    Terminal(RhythmSample),
}

impl Resolution {
    pub fn layer(&self) -> FallbackLayer {
        match self {
            Resolution::Astronomy { layer, .. } => *layer,
            Resolution::Emergency(_) => FallbackLayer::EmergencyBreathing,
            Resolution::Terminal(_) => FallbackLayer::Terminal,
        }
    }

    pub fn astronomy(&self) -> Option<&AstronomicalData> {
        match self {
            Resolution::Astronomy { data, .. } => Some(data),
            _ => None,
        }
    }
}

/// Ordered set of optional fallback layers.
pub struct FallbackCascade {
    api: Option<Box<dyn AstronomySource>>,
    local: Option<Box<dyn AstronomySource>>,
    cache: Option<Arc<dyn AstronomyCache>>,
    emergency: Option<Box<dyn EmergencyPattern>>,
    clock: Arc<dyn TimeSource>,
}

impl Default for FallbackCascade {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackCascade {
    /// A cascade with no layers configured; it always resolves to the terminal
    /// sample.
    pub fn new() -> Self {
        Self {
            api: None,
            local: None,
            cache: None,
            emergency: None,
            clock: time_source::global(),
        }
    }

    pub fn with_api(mut self, source: impl AstronomySource + 'static) -> Self {
        self.api = Some(Box::new(source));
        self
    }

    pub fn with_local(mut self, source: impl AstronomySource + 'static) -> Self {
        self.local = Some(Box::new(source));
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn AstronomyCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_emergency(mut self, pattern: impl EmergencyPattern + 'static) -> Self {
        self.emergency = Some(Box::new(pattern));
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Walk the layers until one succeeds.
    pub fn resolve(&self) -> Resolution {
        if let Some(data) = self.try_source(FallbackLayer::Api, self.api.as_deref()) {
            return Resolution::Astronomy {
                layer: FallbackLayer::Api,
                data,
            };
        }

        if let Some(data) = self.try_source(FallbackLayer::LocalCalculation, self.local.as_deref())
        {
            return Resolution::Astronomy {
                layer: FallbackLayer::LocalCalculation,
                data,
            };
        }

        if let Some(cache) = &self.cache {
            match cache.load() {
                Ok(data) => {
                    log_debug!("Astronomy resolved from {}", FallbackLayer::Cache);
                    return Resolution::Astronomy {
                        layer: FallbackLayer::Cache,
                        data,
                    };
                }
                Err(e) => log_layer_failure(FallbackLayer::Cache, &e),
            }
        }

        let now = self.clock.now().with_timezone(&Utc);

        if let Some(pattern) = &self.emergency {
            match pattern.activate(now) {
                Ok(sample) => {
                    log_warning!("Running {} without astronomy", FallbackLayer::EmergencyBreathing);
                    return Resolution::Emergency(sample);
                }
                Err(e) => log_layer_failure(FallbackLayer::EmergencyBreathing, &e),
            }
        }

        log_critical!("All fallback layers failed; using the terminal amber wave");
        Resolution::Terminal(absolute_fallback(now))
    }

    fn try_source(
        &self,
        layer: FallbackLayer,
        source: Option<&dyn AstronomySource>,
    ) -> Option<AstronomicalData> {
        let source = source?;
        match source.fetch() {
            Ok(data) => {
                log_debug!("Astronomy resolved from {layer}");
                if let Some(cache) = &self.cache
                    && let Err(e) = cache.store(&data)
                {
                    log_warning!("Failed to cache astronomy from {layer}: {e}");
                }
                Some(data)
            }
            Err(e) => {
                log_layer_failure(layer, &e);
                None
            }
        }
    }
}

fn log_layer_failure(layer: FallbackLayer, error: &anyhow::Error) {
    log_warning!("Fallback layer {layer} failed: {error:#}");
}

/// The terminal sample: a slow warm-amber sine wave driven by wall-clock
/// seconds.
pub fn absolute_fallback(now: DateTime<Utc>) -> RhythmSample {
    let seconds = now.timestamp() as f64;
    let brightness =
        BREATH_BASE_BRIGHTNESS + BREATH_SWING * (seconds / TERMINAL_SINE_PERIOD_DIVISOR).sin();

    RhythmSample {
        rgb: WARM_AMBER,
        brightness: brightness.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS),
        temperature_k: FALLBACK_TEMPERATURE_K,
        effects: EnvironmentalEffects::neutral(),
        breathing_rate_bpm: MID_BREATHING_RATE_BPM,
        day_description: "Absolute fallback breathing".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{
        MemoryCache, MockAstronomyCache, MockAstronomySource, MockEmergencyPattern,
        Priority99Breathing,
    };
    use crate::time_source::FixedTimeSource;
    use anyhow::anyhow;
    use chrono::TimeZone;

    fn data(distance: f64) -> AstronomicalData {
        let t = Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
        AstronomicalData {
            sunrise: t,
            sunset: t,
            solar_noon: t,
            golden_hour_begin: t,
            golden_hour_end: t,
            astronomical_twilight_begin: t,
            astronomical_twilight_end: t,
            nautical_twilight_begin: t,
            nautical_twilight_end: t,
            civil_twilight_begin: t,
            civil_twilight_end: t,
            moonrise: None,
            moonset: None,
            lunar_illumination_percentage: 40.0,
            moon_altitude: 5.0,
            moon_age_days: 6.0,
            lunar_distance_km: distance,
        }
    }

    fn failing_source() -> MockAstronomySource {
        let mut source = MockAstronomySource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|| Err(anyhow!("unreachable")));
        source
    }

    fn clock() -> Arc<dyn TimeSource> {
        Arc::new(FixedTimeSource::new(
            crate::time_source::parse_datetime("2025-06-02 12:00:00").unwrap(),
        ))
    }

    #[test]
    fn test_api_success_short_circuits_and_is_cached() {
        let mut api = MockAstronomySource::new();
        api.expect_fetch().times(1).returning(|| Ok(data(370_000.0)));
        let mut local = MockAstronomySource::new();
        local.expect_fetch().never();
        let cache = Arc::new(MemoryCache::new());

        let resolution = FallbackCascade::new()
            .with_api(api)
            .with_local(local)
            .with_cache(cache.clone())
            .with_clock(clock())
            .resolve();

        assert_eq!(resolution.layer(), FallbackLayer::Api);
        assert_eq!(cache.load().unwrap().lunar_distance_km, 370_000.0);
    }

    #[test]
    fn test_local_layer_after_api_failure() {
        let mut local = MockAstronomySource::new();
        local.expect_fetch().times(1).returning(|| Ok(data(380_000.0)));

        let resolution = FallbackCascade::new()
            .with_api(failing_source())
            .with_local(local)
            .with_clock(clock())
            .resolve();

        assert_eq!(resolution.layer(), FallbackLayer::LocalCalculation);
        assert_eq!(resolution.astronomy().unwrap().lunar_distance_km, 380_000.0);
    }

    #[test]
    fn test_cache_store_failure_does_not_fail_layer() {
        let mut local = MockAstronomySource::new();
        local.expect_fetch().times(1).returning(|| Ok(data(380_000.0)));
        let mut cache = MockAstronomyCache::new();
        cache
            .expect_store()
            .times(1)
            .returning(|_| Err(anyhow!("disk full")));
        cache.expect_load().never();

        let resolution = FallbackCascade::new()
            .with_local(local)
            .with_cache(Arc::new(cache))
            .with_clock(clock())
            .resolve();

        assert_eq!(resolution.layer(), FallbackLayer::LocalCalculation);
    }

    #[test]
    fn test_cache_serves_last_known_data() {
        let cache = Arc::new(MemoryCache::with_data(data(399_000.0)));
        let resolution = FallbackCascade::new()
            .with_api(failing_source())
            .with_local(failing_source())
            .with_cache(cache)
            .with_clock(clock())
            .resolve();

        assert_eq!(resolution.layer(), FallbackLayer::Cache);
        assert_eq!(resolution.astronomy().unwrap().lunar_distance_km, 399_000.0);
    }

    #[test]
    fn test_emergency_breathing_when_no_astronomy() {
        let resolution = FallbackCascade::new()
            .with_api(failing_source())
            .with_cache(Arc::new(MemoryCache::new()))
            .with_emergency(Priority99Breathing)
            .with_clock(clock())
            .resolve();

        match resolution {
            Resolution::Emergency(sample) => {
                assert_eq!(sample.temperature_k, 2200.0);
                assert_eq!(sample.breathing_rate_bpm, 11.0);
            }
            other => panic!("expected emergency breathing, got {other:?}"),
        }
    }

    #[test]
    fn test_all_layers_failing_reaches_terminal() {
        let mut cache = MockAstronomyCache::new();
        cache
            .expect_load()
            .times(1)
            .returning(|| Err(anyhow!("empty")));
        let mut emergency = MockEmergencyPattern::new();
        emergency
            .expect_activate()
            .times(1)
            .returning(|_| Err(anyhow!("pattern missing")));

        let resolution = FallbackCascade::new()
            .with_api(failing_source())
            .with_local(failing_source())
            .with_cache(Arc::new(cache))
            .with_emergency(emergency)
            .with_clock(clock())
            .resolve();

        match resolution {
            Resolution::Terminal(sample) => {
                assert_eq!(sample.rgb, WARM_AMBER);
                assert_eq!(sample.temperature_k, 2200.0);
                assert_eq!(sample.breathing_rate_bpm, 11.0);
                assert_eq!(sample.brown_noise_amplitude(), 1.0);
                assert!((0.6..=1.0).contains(&sample.brightness));
            }
            other => panic!("expected terminal sample, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_cascade_is_terminal() {
        let cascade = FallbackCascade::new().with_clock(clock());
        assert_eq!(cascade.resolve().layer(), FallbackLayer::Terminal);
        assert!(cascade.resolve().astronomy().is_none());
    }

    #[test]
    fn test_absolute_fallback_wave() {
        let at_zero = absolute_fallback(DateTime::<Utc>::UNIX_EPOCH);
        assert!((at_zero.brightness - 0.8).abs() < 1e-12);
        assert_eq!(at_zero.effects, EnvironmentalEffects::neutral());
    }
}
