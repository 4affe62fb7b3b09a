//! Main application entry point.
//!
//! Parses arguments, handles help/version early, loads configuration once and
//! dispatches to the command handlers in the library.

use anyhow::Result;

use rhythm_engine::args::{CliAction, ParsedArgs};
use rhythm_engine::commands::{help, run, sample, simulate};
use rhythm_engine::common::constants::EXIT_FAILURE;
use rhythm_engine::config::{self, Config};
use rhythm_engine::{log_end, log_error_exit, log_indented, log_pipe, log_version};

fn main() -> Result<()> {
    let parsed_args = ParsedArgs::from_env();

    match parsed_args.action {
        CliAction::ShowVersion => {
            help::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            help::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            help::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::HelpCommand { command } => help::run_help_command(command.as_deref()),
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => {
            log_version!();
            let config = load_config(config_dir)?;
            if debug_enabled {
                config.log_config();
            }
            run::handle_run_command(&config, debug_enabled)
        }
        CliAction::Sample {
            debug_enabled,
            config_dir,
            module,
            json,
        } => {
            if !json {
                log_version!();
            }
            let config = load_config(config_dir)?;
            if debug_enabled && !json {
                config.log_config();
            }
            sample::handle_sample_command(&config, module.as_deref(), json)
        }
        CliAction::Simulate {
            debug_enabled,
            config_dir,
            start_time,
            multiplier,
            steps,
            log_to_file,
        } => {
            let config = load_config(config_dir)?;
            if debug_enabled {
                config.log_config();
            }
            simulate::handle_simulate_command(&config, &start_time, multiplier, steps, log_to_file)
        }
    }
}

/// Load configuration, exiting with a logged error if it is unusable.
fn load_config(config_dir: Option<String>) -> Result<Config> {
    config::set_config_dir(config_dir)?;
    match config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            log_pipe!();
            log_error_exit!("Configuration failed");
            log_indented!("{e:#}");
            log_end!();
            std::process::exit(EXIT_FAILURE);
        }
    }
}
