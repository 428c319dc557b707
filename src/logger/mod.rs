//! Structured logging for poolcandles
//!
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<module> flags
//! - Dual output: colored console + file persistence
//!
//! ## Usage
//!
//! ```rust,ignore
//! use poolcandles::logger::{self, LogTag};
//!
//! logger::init();
//! logger::info(LogTag::Collector, "Round finished");
//! logger::debug(LogTag::Rpc, "Request details: ..."); // Only with --debug-rpc
//! ```

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// Must be called once at startup, before services are spawned. Reads the
/// debug flags from the command line and opens the log file unless
/// `--no-log-file` was given.
pub fn init() {
    config::init_from_args();

    if get_logger_config().file_logging {
        file::init_file_logging();
    }
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (hidden only by explicit --log-level=error)
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level, only shown with --debug-<module> for the tag
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level, only shown with --verbose
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Returns true when debug output for the tag would be printed
///
/// Lets callers skip building expensive debug messages.
pub fn is_debug_enabled(tag: &LogTag) -> bool {
    core::should_log(tag, LogLevel::Debug)
}

/// Force flush all pending log writes
pub fn flush() {
    file::flush_file_logging();
}
