//! `simulate`: replay accelerated simulated time through the full pipeline.
//!
//! Each step advances the simulated clock by the update interval scaled by the
//! time acceleration, so real-time cadence matches `run` while the simulated
//! day passes quickly. A multiplier of 0 fast-forwards without waiting.

use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Local};
use std::sync::Arc;
use std::time::Duration;

use super::{Pipeline, log_frame};
use crate::common::constants::*;
use crate::config::Config;
use crate::coordinator::TrackCoordinator;
use crate::logger::Log;
use crate::time_source::{self, SimulatedTimeSource};

/// Simulated time covered by one step.
pub fn step_duration(update_interval: Duration, multiplier: f64) -> Duration {
    let scale = if multiplier > 0.0 {
        multiplier
    } else {
        DEFAULT_TIME_ACCELERATION
    };
    update_interval.mul_f64(scale)
}

pub fn handle_simulate_command(
    config: &Config,
    start_time: &str,
    multiplier: Option<f64>,
    steps: Option<u64>,
    log_to_file: bool,
) -> Result<()> {
    let start = time_source::parse_datetime(start_time)
        .map_err(|e| anyhow::anyhow!("Invalid start time: {}", e))?;
    let multiplier = multiplier.unwrap_or_else(|| config.time_acceleration());
    if multiplier > MAXIMUM_TIME_ACCELERATION {
        anyhow::bail!(
            "multiplier must be between 0 and {} (got {})",
            MAXIMUM_TIME_ACCELERATION,
            multiplier
        );
    }
    let steps = steps.unwrap_or(DEFAULT_SIMULATION_STEPS);

    let step = step_duration(config.update_interval(), multiplier);
    let span = step
        .checked_mul(u32::try_from(steps).unwrap_or(u32::MAX))
        .and_then(|total| ChronoDuration::from_std(total).ok())
        .context("Simulation span is too long")?;
    let end = start
        .checked_add_signed(span)
        .context("Simulation end time is out of range")?;

    let log_guard = if log_to_file {
        let filename = format!(
            "rhythm-engine-simulation-{}.log",
            Local::now().format("%Y%m%d-%H%M%S")
        );
        log_block_start!("Writing simulation log to {}", filename);
        Some(Log::start_file_logging(filename)?)
    } else {
        None
    };

    // Install before any timestamped logging
    let source = Arc::new(SimulatedTimeSource::new(start, end, multiplier));
    time_source::init_time_source(source);
    if !time_source::is_simulated() {
        anyhow::bail!("Time source was already initialized; cannot simulate");
    }

    log_version!();
    log_block_start!("Simulation Mode");
    log_decorated!(
        "Simulating from {} to {}",
        start.format("%Y-%m-%d %H:%M:%S"),
        end.format("%Y-%m-%d %H:%M:%S")
    );
    if multiplier == 0.0 {
        log_indented!("Time acceleration: fast-forward (instant execution)");
    } else {
        log_indented!(
            "Time acceleration: {}x, {} steps of {:.1}s simulated",
            multiplier,
            steps,
            step.as_secs_f64()
        );
    }

    let clock = time_source::global();
    let pipeline = Pipeline::from_config(config, clock.clone());
    let mut coordinator =
        TrackCoordinator::with_schedule(config.week(), config.interpolation(), clock.clone());
    let module = config.module();

    let mut frames = 0;
    while frames < steps {
        let report = pipeline.next_frame(&mut coordinator, module, clock.now())?;
        log_frame(&report);
        frames += 1;
        if clock.is_ended() {
            break;
        }
        clock.sleep(step);
    }

    log_block_start!("Simulation complete: {} frames", frames);
    log_end!();
    drop(log_guard);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_duration_scales_with_multiplier() {
        let interval = Duration::from_millis(100);
        assert_eq!(step_duration(interval, 60.0), Duration::from_secs(6));
        assert_eq!(step_duration(interval, 3600.0), Duration::from_secs(360));
        // Fast-forward still covers the default acceleration per step
        assert_eq!(step_duration(interval, 0.0), Duration::from_secs(6));
    }
}
