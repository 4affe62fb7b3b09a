//! Help output for rhythm-engine and its commands.

use anyhow::Result;

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays the general usage message.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("rhythm-engine [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Log every frame in the live loop");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("run, r                 Breathe live until interrupted (default)");
    log_indented!("sample, s              Print one frame for both tracks");
    log_indented!("simulate, S            Replay accelerated simulated time");
    log_indented!("help, h [COMMAND]      Show detailed help for a command");
    log_end!();
}

/// Run the help command (dispatcher)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => display_help(),
        Some("run") | Some("r") => display_run_help(),
        Some("sample") | Some("s") => display_sample_help(),
        Some("simulate") | Some("S") => display_simulate_help(),
        Some(unknown) => {
            log_warning!("Unknown command: {}", unknown);
            display_help();
        }
    }
    Ok(())
}

fn display_run_help() {
    log_version!();
    log_block_start!("run - Breathe live until interrupted");
    log_block_start!("Usage: rhythm-engine run");
    log_block_start!("Signals:");
    log_indented!("SIGINT, SIGTERM  Stop after the current frame");
    log_indented!("SIGUSR1          Toggle the heartbeat overlay");
    log_end!();
}

fn display_sample_help() {
    log_version!();
    log_block_start!("sample - Print one frame for both tracks");
    log_block_start!("Usage: rhythm-engine sample [--module <name>] [--json]");
    log_block_start!("Options:");
    log_indented!("-m, --module <name>  wakeful_breathing, sleep_breathing, meditation,");
    log_indented!("                     inebriated or emergency_fallback");
    log_indented!("-j, --json           Print the frame as JSON");
    log_end!();
}

fn display_simulate_help() {
    log_version!();
    log_block_start!("simulate - Replay accelerated simulated time");
    log_block_start!(
        "Usage: rhythm-engine simulate --from \"YYYY-MM-DD HH:MM:SS\" [--multiplier N] [--steps N] [--log]"
    );
    log_block_start!("Options:");
    log_indented!("-f, --from <time>       Simulated start time (local)");
    log_indented!("-x, --multiplier <n>    Time acceleration, 0 = fast-forward (default from config)");
    log_indented!("-n, --steps <n>         Number of frames (default 20)");
    log_indented!("-l, --log               Write output to a timestamped log file");
    log_end!();
}
