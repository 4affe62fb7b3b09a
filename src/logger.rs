//! Structured logging system with visual formatting.
//!
//! This module provides the box-drawing log output used by the rhythm-engine
//! binary and by the library's resilience paths (fallback cascade, config and
//! schedule loading). The synthesizer itself never logs; it runs every frame.
//!
//! The logger supports runtime enable/disable for quiet operation during
//! automated processes or testing, and can be redirected to a file while a
//! simulation runs.

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};

// Use an AtomicBool instead of thread_local for thread safety
static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

// Channel for routing output to file when --log is active
static LOG_CHANNEL: OnceLock<Option<Sender<LogMessage>>> = OnceLock::new();

enum LogMessage {
    Formatted(String),
    Shutdown,
}

/// Main logging interface providing structured output formatting.
///
/// ## Logging Conventions
///
/// - **`log_block_start!`**: begins a distinct block of information (a new
///   sample, a fallback resolution, loading configuration). Prints an empty
///   pipe `┃` for spacing, then `┣ message`.
/// - **`log_decorated!`**: a message inside the current block, `┣ message`.
/// - **`log_indented!`**: nested details such as sample fields, `┃   message`.
/// - **`log_pipe!`**: a single empty `┃` line, used before the semantic
///   level macros when they open a new block.
/// - **`log_version!`** / **`log_end!`**: start header and termination marker.
/// - **`log_info!`, `log_warning!`, `log_error!`, `log_debug!`, `log_critical!`**:
///   semantic messages with a `[LEVEL]` prefix.
pub struct Log;

impl Log {
    /// Enable or disable logging temporarily.
    ///
    /// This is useful for quiet operation during automated processes
    /// or testing where log output would interfere with results.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Start file logging to the specified path.
    pub fn start_file_logging(file_path: String) -> anyhow::Result<LoggerGuard> {
        let (tx, rx) = channel();

        // Install the channel
        LOG_CHANNEL
            .set(Some(tx.clone()))
            .map_err(|_| anyhow::anyhow!("Logger channel already initialized"))?;

        // Spawn logger thread
        let handle = std::thread::spawn(move || {
            let mut file = std::fs::File::create(&file_path)?;

            loop {
                match rx.recv() {
                    Ok(LogMessage::Formatted(text)) => {
                        file.write_all(text.as_bytes())?;
                    }
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }

            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }

    // # Helper Functions

    /// Get timestamp prefix for simulation mode.
    /// Shows the simulated clock as [YYYY-MM-DD HH:MM:SS] so accelerated runs
    /// read as a timeline. Returns empty string outside simulation.
    pub fn get_timestamp_prefix() -> String {
        // Check this without initializing the time source
        if crate::time_source::is_initialized() && crate::time_source::is_simulated() {
            let now = crate::time_source::now();
            format!("[{}] ", now.format("%Y-%m-%d %H:%M:%S"))
        } else {
            String::new()
        }
    }
}

/// Guard for file logging that ensures clean shutdown.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        // LOG_CHANNEL stays set; the process exits after simulation
    }
}

// Helper function to strip ANSI color codes from text
fn strip_ansi_codes(text: &str) -> String {
    // Regex pattern for ANSI escape sequences
    // Matches: ESC [ ... m where ... is any sequence of digits and semicolons
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            // Check if this is the start of an ANSI sequence
            if chars.peek() == Some(&'[') {
                chars.next(); // consume '['
                // Skip until we find 'm'
                for ch in chars.by_ref() {
                    if ch == 'm' {
                        break;
                    }
                }
            } else {
                result.push(ch);
            }
        } else {
            result.push(ch);
        }
    }

    result
}

// Public function that routes output (needed by macros)
pub fn write_output(text: &str) {
    if let Some(Some(tx)) = LOG_CHANNEL.get() {
        // Send to file logger thread - strip ANSI codes for clean file output
        let clean_text = strip_ansi_codes(text);
        let _ = tx.send(LogMessage::Formatted(clean_text));
    } else {
        // Normal output with colors
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

/// Emit one decorated line if logging is enabled.
#[doc(hidden)]
pub fn emit(decoration: &str, message: std::fmt::Arguments<'_>) {
    if Log::is_enabled() {
        let prefix = Log::get_timestamp_prefix();
        write_output(&format!("{prefix}{decoration}{message}\n"));
    }
}

/// Emit a spacer pipe followed by a block-start line.
#[doc(hidden)]
pub fn emit_block(decoration: &str, message: std::fmt::Arguments<'_>) {
    if Log::is_enabled() {
        let prefix = Log::get_timestamp_prefix();
        write_output(&format!("{prefix}┃\n{prefix}{decoration}{message}\n"));
    }
}

// # Logging Macros
//
// Each macro accepts either a format string literal with arguments or a single
// displayable expression.

/// Log a decorated message, typically as part of an existing block.
#[macro_export]
macro_rules! log_decorated {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit("┣ ", format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit("┣ ", format_args!("{}", $expr))
    };
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit("┃   ", format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit("┃   ", format_args!("{}", $expr))
    };
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::logger::emit("┃", format_args!(""))
    };
}

/// Log a block start message, initiating a new conceptual block of information.
#[macro_export]
macro_rules! log_block_start {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit_block("┣ ", format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit_block("┣ ", format_args!("{}", $expr))
    };
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::logger::emit(
            "┏ ",
            format_args!("rhythm-engine v{} ━━╸", env!("CARGO_PKG_VERSION")),
        )
    };
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::logger::emit("╹", format_args!(""))
    };
}

/// Log a warning message with pipe prefix and yellow-colored text.
#[macro_export]
macro_rules! log_warning {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit("┣[\x1b[33mWARNING\x1b[0m] ", format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit("┣[\x1b[33mWARNING\x1b[0m] ", format_args!("{}", $expr))
    };
}

/// Log an error message with pipe prefix and red-colored text.
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit("┣[\x1b[31mERROR\x1b[0m] ", format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit("┣[\x1b[31mERROR\x1b[0m] ", format_args!("{}", $expr))
    };
}

/// Log an error that terminates the current flow, closing the block with `┗`.
#[macro_export]
macro_rules! log_error_exit {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit_block("┗[\x1b[31mERROR\x1b[0m] ", format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit_block("┗[\x1b[31mERROR\x1b[0m] ", format_args!("{}", $expr))
    };
}

/// Log an informational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit("┣[\x1b[32mINFO\x1b[0m] ", format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit("┣[\x1b[32mINFO\x1b[0m] ", format_args!("{}", $expr))
    };
}

/// Log a debug/operational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit("┣[\x1b[32mDEBUG\x1b[0m] ", format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit("┣[\x1b[32mDEBUG\x1b[0m] ", format_args!("{}", $expr))
    };
}

/// Log a critical message with pipe prefix and red-colored text.
#[macro_export]
macro_rules! log_critical {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit("┣[\x1b[31mCRITICAL\x1b[0m] ", format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit("┣[\x1b[31mCRITICAL\x1b[0m] ", format_args!("{}", $expr))
    };
}
