/// Core logging implementation with automatic filtering
use super::config::{get_logger_config, LoggerConfig};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Check if a log message should be displayed
pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    should_log_with(&get_logger_config(), tag, level)
}

/// Filtering rules:
/// 1. Errors are always shown
/// 2. Check against minimum log level threshold
/// 3. Debug level requires --debug-<module> (or --debug-all)
/// 4. Verbose level requires --verbose OR --verbose-<module>
fn should_log_with(config: &LoggerConfig, tag: &LogTag, level: LogLevel) -> bool {
    if level == LogLevel::Error {
        return true;
    }

    if level > config.min_level {
        return false;
    }

    match level {
        LogLevel::Debug => config.is_debug_enabled_for_tag(tag),
        LogLevel::Verbose => config.is_verbose_enabled_for_tag(tag),
        _ => true,
    }
}

pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    super::format::format_and_log(tag, level, message);
}
