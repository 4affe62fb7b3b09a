//! Time source abstraction for supporting both real-time and simulated time.
//!
//! Breath phase is derived from the wall clock, so every clock read in the
//! engine goes through a [`TimeSource`]. The process-wide source defaults to
//! [`RealTimeSource`]; the `simulate` command installs a
//! [`SimulatedTimeSource`] to run accelerated days, and tests inject a
//! [`FixedTimeSource`] directly into the coordinator.

use chrono::{DateTime, Duration as ChronoDuration, Local, TimeZone};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration as StdDuration;

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Local>;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;

    /// Check if simulation has ended (always false for real time)
    fn is_ended(&self) -> bool {
        false
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn chrono_from_std(duration: StdDuration) -> ChronoDuration {
    ChronoDuration::from_std(duration).unwrap_or(ChronoDuration::MAX)
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Simulated time source for time-accelerated prototype runs.
///
/// Two modes:
/// - Linear acceleration: sleeping `d` takes `d / multiplier` of real time
///   (the prototype default of 60.0 plays one minute per second)
/// - Fast-forward (multiplier = 0.0): sleeps advance the clock instantly
pub struct SimulatedTimeSource {
    start_time: DateTime<Local>,
    end_time: DateTime<Local>,
    time_multiplier: f64,
    /// Simulated time accumulated through completed sleeps
    elapsed: Mutex<ChronoDuration>,
}

impl SimulatedTimeSource {
    /// Create a new simulated time source.
    ///
    /// A negative multiplier falls back to 60.0; zero selects fast-forward.
    pub fn new(start_time: DateTime<Local>, end_time: DateTime<Local>, multiplier: f64) -> Self {
        let time_multiplier = if multiplier < 0.0 || multiplier.is_nan() {
            crate::common::constants::DEFAULT_TIME_ACCELERATION
        } else {
            multiplier
        };
        Self {
            start_time,
            end_time,
            time_multiplier,
            elapsed: Mutex::new(ChronoDuration::zero()),
        }
    }

    pub fn multiplier(&self) -> f64 {
        self.time_multiplier
    }

    fn current_time(&self) -> DateTime<Local> {
        let simulated = self.start_time + *lock(&self.elapsed);
        simulated.min(self.end_time)
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Local> {
        self.current_time()
    }

    fn sleep(&self, duration: StdDuration) {
        let remaining = self.end_time - self.current_time();
        let step = chrono_from_std(duration).min(remaining.max(ChronoDuration::zero()));

        if self.time_multiplier > 0.0 {
            let real_secs = step.num_milliseconds() as f64 / 1000.0 / self.time_multiplier;
            if real_secs > 0.0 {
                std::thread::sleep(StdDuration::from_secs_f64(real_secs));
            }
        } else {
            // Let log output drain between fast-forward steps
            std::thread::sleep(StdDuration::from_millis(1));
        }

        *lock(&self.elapsed) += step;
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.current_time() >= self.end_time
    }
}

/// Manually driven clock for tests and deterministic replays.
///
/// `sleep` advances the clock without blocking.
pub struct FixedTimeSource {
    current: Mutex<DateTime<Local>>,
}

impl FixedTimeSource {
    pub fn new(at: DateTime<Local>) -> Self {
        Self {
            current: Mutex::new(at),
        }
    }

    pub fn set(&self, at: DateTime<Local>) {
        *lock(&self.current) = at;
    }

    pub fn advance(&self, by: ChronoDuration) {
        *lock(&self.current) += by;
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Local> {
        *lock(&self.current)
    }

    fn sleep(&self, duration: StdDuration) {
        self.advance(chrono_from_std(duration));
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// The global time source, initializing it to real time if unset.
pub fn global() -> Arc<dyn TimeSource> {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .clone()
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Local> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Check if we're running in simulation mode
pub fn is_simulated() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_simulated()
}

/// Check if simulation has reached its end time (always false for real time)
pub fn simulation_ended() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_ended()
}

/// Parse a datetime string in the format "YYYY-MM-DD HH:MM:SS"
pub fn parse_datetime(s: &str) -> Result<DateTime<Local>, String> {
    use chrono::NaiveDateTime;

    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))
        .and_then(|naive| {
            Local
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(|| "Ambiguous or invalid local time".to_string())
        })
}
