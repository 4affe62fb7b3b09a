//! Signal handling for the live loop.
//!
//! - `SIGINT`/`SIGTERM`: stop after the current frame
//! - `SIGUSR1`: toggle the heartbeat overlay on both tracks

use anyhow::{Context, Result};
use signal_hook::consts::signal::{SIGINT, SIGTERM, SIGUSR1};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Flags raised by signal handlers and polled by the run loop.
pub struct SignalState {
    shutdown: Arc<AtomicBool>,
    heartbeat_toggle: Arc<AtomicBool>,
}

impl SignalState {
    pub fn should_stop(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Whether a heartbeat toggle was requested since the last call.
    pub fn take_heartbeat_toggle(&self) -> bool {
        self.heartbeat_toggle.swap(false, Ordering::SeqCst)
    }
}

pub fn setup_signal_handler() -> Result<SignalState> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let heartbeat_toggle = Arc::new(AtomicBool::new(false));

    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&shutdown))
            .with_context(|| format!("failed to register handler for signal {signal}"))?;
    }
    signal_hook::flag::register(SIGUSR1, Arc::clone(&heartbeat_toggle))
        .context("failed to register heartbeat toggle handler")?;

    Ok(SignalState {
        shutdown,
        heartbeat_toggle,
    })
}
