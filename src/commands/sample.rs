//! `sample`: compute one coordinated frame for both tracks.

use anyhow::{Context, Result};

use super::{Pipeline, log_frame};
use crate::config::Config;
use crate::coordinator::TrackCoordinator;
use crate::logger::Log;
use crate::model::Module;
use crate::time_source;

/// Resolve the module to sample: the command-line override wins over config.
pub fn resolve_module(config: &Config, module_override: Option<&str>) -> Result<Module> {
    match module_override {
        Some(name) => name.parse().context("Invalid --module value"),
        None => Ok(config.module()),
    }
}

pub fn handle_sample_command(config: &Config, module_override: Option<&str>, json: bool) -> Result<()> {
    let module = resolve_module(config, module_override)?;

    // Keep stdout clean for machine-readable output
    if json {
        Log::set_enabled(false);
    }

    let clock = time_source::global();
    let pipeline = Pipeline::from_config(config, clock.clone());
    let mut coordinator =
        TrackCoordinator::with_schedule(config.week(), config.interpolation(), clock.clone());
    let report = pipeline.next_frame(&mut coordinator, module, clock.now())?;

    if json {
        let output =
            serde_json::to_string_pretty(&report).context("Failed to serialize sample as JSON")?;
        println!("{output}");
        Log::set_enabled(true);
        return Ok(());
    }

    log_frame(&report);
    log_end!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_override_wins() {
        let config = Config {
            module: Some(Module::SleepBreathing),
            ..Default::default()
        };
        assert_eq!(resolve_module(&config, None).unwrap(), Module::SleepBreathing);
        assert_eq!(
            resolve_module(&config, Some("inebriated")).unwrap(),
            Module::Inebriated
        );
        assert!(resolve_module(&config, Some("jogging")).is_err());
    }
}
