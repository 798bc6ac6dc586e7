//! Structured logging system with visual formatting.
//!
//! This module provides a logging system designed for calistimer's visual output style.
//! It includes different log levels and special formatting functions for creating
//! visually appealing, structured output with Unicode box drawing characters.
//!
//! The logger supports runtime enable/disable functionality for quiet operation
//! while the live timer screen owns the terminal, or during testing.

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
/// - **`log_block_start!`**: begins a new conceptual block (e.g. "Starting workout",
///   "Loaded configuration"). Prints an empty pipe `┃` for spacing, then `┣ message`.
/// - **`log_decorated!`**: a message inside the current block, `┣ message`.
/// - **`log_indented!`**: nested details of the previous message, `┃   message`.
/// - **`log_pipe!`**: a single empty `┃` line. Use it before `log_warning!`, `log_error!`,
///   `log_info!` and friends when they start a block of their own. Not for use at the end
///   of a block.
/// - **`log_version!`**: the startup header `┏ calistimer vX.Y.Z ━━╸`.
/// - **`log_end!`**: the final termination marker `╹`.
/// - **`log_info!`, `log_warning!`, `log_error!`, `log_debug!`**: semantic
///   messages with a coloured `[LEVEL]` prefix.
pub struct Log;

impl Log {
    /// Enable or disable logging temporarily.
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

    /// Whether output is being routed to a log file instead of the terminal.
    pub fn is_logging_to_file() -> bool {
        matches!(LOG_CHANNEL.get(), Some(Some(_)))
    }

    // # Helper Functions

    /// Get timestamp prefix for simulated clocks.
    ///
    /// Shows `[HH:MM:SS]` of the simulated time, or an empty string on the real clock.
    /// Public for macro access.
    pub fn get_timestamp_prefix() -> String {
        // Check this without initializing the time source
        if crate::time_source::is_initialized() && crate::time_source::is_simulated() {
            format!("[{}] ", crate::time_source::now().format("%H:%M:%S"))
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
        // LOG_CHANNEL stays installed, OnceLock can only be set once per process
    }
}

// Strip ANSI colour sequences (ESC [ ... m) from text
fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            if chars.peek() == Some(&'[') {
                chars.next(); // consume '['
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
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

/// Write one decorated line, optionally preceded by an empty `┃` spacer.
/// Public for macro access.
#[doc(hidden)]
pub fn emit(marker: &str, spaced: bool, message: std::fmt::Arguments<'_>) {
    if !Log::is_enabled() {
        return;
    }
    let prefix = Log::get_timestamp_prefix();
    let spacer = if spaced {
        format!("{prefix}┃\n")
    } else {
        String::new()
    };
    write_output(&format!("{spacer}{prefix}{marker}{message}\n"));
}

// # Logging Macros
//
// Every macro takes either a format string with arguments or a single
// displayable expression.

/// Log a decorated message, typically as part of an existing block or for standalone emphasis.
#[macro_export]
macro_rules! log_decorated {
    ($fmt:literal $($arg:tt)*) => {
        $crate::common::logger::emit("┣ ", false, format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::common::logger::emit("┣ ", false, format_args!("{}", $expr))
    };
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    ($fmt:literal $($arg:tt)*) => {
        $crate::common::logger::emit("┃   ", false, format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::common::logger::emit("┃   ", false, format_args!("{}", $expr))
    };
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::common::logger::emit("┃", false, format_args!(""))
    };
}

/// Log a block start message, initiating a new conceptual block of information.
#[macro_export]
macro_rules! log_block_start {
    ($fmt:literal $($arg:tt)*) => {
        $crate::common::logger::emit("┣ ", true, format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::common::logger::emit("┣ ", true, format_args!("{}", $expr))
    };
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::common::logger::emit(
            "┏ ",
            false,
            format_args!("calistimer v{} ━━╸", env!("CARGO_PKG_VERSION")),
        )
    };
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::common::logger::emit("╹", false, format_args!(""))
    };
}

/// Log a warning message with pipe prefix and yellow-colored text.
#[macro_export]
macro_rules! log_warning {
    ($fmt:literal $($arg:tt)*) => {
        $crate::common::logger::emit("┣[\x1b[33mWARNING\x1b[0m] ", false, format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::common::logger::emit("┣[\x1b[33mWARNING\x1b[0m] ", false, format_args!("{}", $expr))
    };
}

/// Log an error message with pipe prefix and red-colored text.
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::common::logger::emit("┣[\x1b[31mERROR\x1b[0m] ", false, format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::common::logger::emit("┣[\x1b[31mERROR\x1b[0m] ", false, format_args!("{}", $expr))
    };
}

/// Log an error that ends the run: a spacer pipe, then the error on a closing corner.
#[macro_export]
macro_rules! log_error_exit {
    ($fmt:literal $($arg:tt)*) => {
        $crate::common::logger::emit("┗[\x1b[31mERROR\x1b[0m] ", true, format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::common::logger::emit("┗[\x1b[31mERROR\x1b[0m] ", true, format_args!("{}", $expr))
    };
}

/// Log an informational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::common::logger::emit("┣[\x1b[32mINFO\x1b[0m] ", false, format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::common::logger::emit("┣[\x1b[32mINFO\x1b[0m] ", false, format_args!("{}", $expr))
    };
}

/// Log a debug/operational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::common::logger::emit("┣[\x1b[32mDEBUG\x1b[0m] ", false, format_args!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::common::logger::emit("┣[\x1b[32mDEBUG\x1b[0m] ", false, format_args!("{}", $expr))
    };
}
