//! Command-line argument parsing and processing.
//!
//! Global flags (`--config`, `--debug`, `--help`, `--version`) may appear
//! anywhere; the first non-flag argument selects the command. Running with no
//! command starts the live loop.

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the live sampling loop
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Print one coordinated sample for both tracks
    Sample {
        debug_enabled: bool,
        config_dir: Option<String>,
        module: Option<String>,
        json: bool,
    },
    /// Replay a stretch of accelerated simulated time
    Simulate {
        debug_enabled: bool,
        config_dir: Option<String>,
        start_time: String,
        multiplier: Option<f64>,
        steps: Option<u64>,
        log_to_file: bool,
    },
    /// Show help for a specific command
    HelpCommand { command: Option<String> },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown or malformed arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

/// Flags that take a value, so their value is never mistaken for a command.
const VALUE_FLAGS: [&str; 10] = [
    "--config",
    "-c",
    "--module",
    "-m",
    "--from",
    "-f",
    "--multiplier",
    "-x",
    "--steps",
    "-n",
];

impl ParsedArgs {
    /// Parse command-line arguments (including the program name) into an action.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let action = Self::parse_action(&args_vec);
        ParsedArgs { action }
    }

    fn parse_action(args: &[String]) -> CliAction {
        if args
            .iter()
            .any(|arg| arg == "--version" || arg == "-V" || arg == "-v")
        {
            return CliAction::ShowVersion;
        }
        if args.iter().any(|arg| arg == "--help" || arg == "-h") {
            return CliAction::ShowHelp;
        }

        let debug_enabled = args.iter().any(|arg| arg == "--debug" || arg == "-d");
        let config_dir = match flag_value(args, &["--config", "-c"]) {
            Ok(dir) => dir,
            Err(()) => return CliAction::ShowHelpDueToError,
        };

        // Locate the command, skipping flags and their values
        let mut command_idx = None;
        let mut idx = 0;
        while idx < args.len() {
            let arg = &args[idx];
            if VALUE_FLAGS.contains(&arg.as_str()) {
                idx += 2;
            } else if arg.starts_with('-') {
                idx += 1;
            } else {
                command_idx = Some(idx);
                break;
            }
        }

        let Some(command_idx) = command_idx else {
            return if has_unknown_flags(args, &[]) {
                CliAction::ShowHelpDueToError
            } else {
                CliAction::Run {
                    debug_enabled,
                    config_dir,
                }
            };
        };

        let rest = &args[command_idx + 1..];
        match args[command_idx].as_str() {
            "run" | "r" => {
                if has_unknown_flags(args, &[]) {
                    return CliAction::ShowHelpDueToError;
                }
                CliAction::Run {
                    debug_enabled,
                    config_dir,
                }
            }
            "sample" | "s" => {
                if has_unknown_flags(args, &["--module", "-m", "--json", "-j"]) {
                    return CliAction::ShowHelpDueToError;
                }
                let Ok(module) = flag_value(args, &["--module", "-m"]) else {
                    log_warning!("Missing value for --module. Usage: rhythm-engine sample [--module <name>] [--json]");
                    return CliAction::ShowHelpDueToError;
                };
                CliAction::Sample {
                    debug_enabled,
                    config_dir,
                    module,
                    json: args.iter().any(|arg| arg == "--json" || arg == "-j"),
                }
            }
            "simulate" | "S" => Self::parse_simulate(args, debug_enabled, config_dir),
            "help" | "h" => CliAction::HelpCommand {
                command: rest.iter().find(|arg| !arg.starts_with('-')).cloned(),
            },
            unknown => {
                log_warning!("Unknown command: {}", unknown);
                CliAction::ShowHelpDueToError
            }
        }
    }

    fn parse_simulate(args: &[String], debug_enabled: bool, config_dir: Option<String>) -> CliAction {
        const USAGE: &str = "Usage: rhythm-engine simulate --from \"YYYY-MM-DD HH:MM:SS\" [--multiplier N] [--steps N] [--log]";

        if has_unknown_flags(
            args,
            &["--from", "-f", "--multiplier", "-x", "--steps", "-n", "--log", "-l"],
        ) {
            return CliAction::ShowHelpDueToError;
        }

        let start_time = match flag_value(args, &["--from", "-f"]) {
            Ok(Some(start)) => start,
            _ => {
                log_warning!("Missing start time for simulate. {}", USAGE);
                return CliAction::ShowHelpDueToError;
            }
        };

        let multiplier = match flag_value(args, &["--multiplier", "-x"]) {
            Ok(None) => None,
            Ok(Some(value)) => match value.parse::<f64>() {
                Ok(multiplier) if multiplier >= 0.0 => Some(multiplier),
                _ => {
                    log_warning!("Invalid multiplier '{}'. {}", value, USAGE);
                    return CliAction::ShowHelpDueToError;
                }
            },
            Err(()) => return CliAction::ShowHelpDueToError,
        };

        let steps = match flag_value(args, &["--steps", "-n"]) {
            Ok(None) => None,
            Ok(Some(value)) => match value.parse::<u64>() {
                Ok(steps) if steps > 0 => Some(steps),
                _ => {
                    log_warning!("Invalid step count '{}'. {}", value, USAGE);
                    return CliAction::ShowHelpDueToError;
                }
            },
            Err(()) => return CliAction::ShowHelpDueToError,
        };

        CliAction::Simulate {
            debug_enabled,
            config_dir,
            start_time,
            multiplier,
            steps,
            log_to_file: args.iter().any(|arg| arg == "--log" || arg == "-l"),
        }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Value following the first occurrence of any of `names`.
///
/// `Err` when the flag is present without a value.
fn flag_value(args: &[String], names: &[&str]) -> Result<Option<String>, ()> {
    match args.iter().position(|arg| names.contains(&arg.as_str())) {
        None => Ok(None),
        Some(idx) => match args.get(idx + 1) {
            Some(value) if !value.starts_with("--") => Ok(Some(value.clone())),
            _ => Err(()),
        },
    }
}

/// Whether any flag outside the global set and `allowed` is present.
fn has_unknown_flags(args: &[String], allowed: &[&str]) -> bool {
    const GLOBAL: [&str; 4] = ["--debug", "-d", "--config", "-c"];
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if !arg.starts_with('-') {
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
        }
        if !GLOBAL.contains(&arg.as_str()) && !allowed.contains(&arg.as_str()) {
            log_warning!("Unknown argument: {}", arg);
            return true;
        }
    }
    false
}
