//! `run`: the live loop, one frame per update interval until SIGINT/SIGTERM.

use anyhow::Result;

use super::{Pipeline, log_frame};
use crate::config::Config;
use crate::coordinator::TrackCoordinator;
use crate::signals::setup_signal_handler;
use crate::time_source;

pub fn handle_run_command(config: &Config, debug_enabled: bool) -> Result<()> {
    let signals = setup_signal_handler()?;

    let clock = time_source::global();
    let pipeline = Pipeline::from_config(config, clock.clone());
    let mut coordinator =
        TrackCoordinator::with_schedule(config.week(), config.interpolation(), clock.clone());
    let module = config.module();
    let interval = config.update_interval();

    log_block_start!(
        "Breathing {} every {} ms (Ctrl+C to stop, SIGUSR1 toggles heartbeat)",
        module,
        interval.as_millis()
    );

    let mut last_layer = None;
    while !signals.should_stop() {
        if signals.take_heartbeat_toggle() {
            let active = !coordinator.clock().heartbeat_active;
            coordinator.set_heartbeat(active);
            log_block_start!("Heartbeat {}", if active { "armed" } else { "disarmed" });
        }

        let report = pipeline.next_frame(&mut coordinator, module, clock.now())?;

        // Frames are too frequent to log each one outside debug mode
        if debug_enabled || last_layer != Some(report.layer) {
            log_frame(&report);
        }
        last_layer = Some(report.layer);

        clock.sleep(interval);
    }

    log_block_start!("Shutting down");
    log_end!();
    Ok(())
}
