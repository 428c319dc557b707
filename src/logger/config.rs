/// Logger configuration derived from command-line flags
use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments::get_cmd_args;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Messages above this level are dropped
    pub min_level: LogLevel,
    /// Tags with debug output enabled (`--debug-<tag>`)
    pub debug_tags: HashSet<String>,
    /// Tags with verbose output enabled (`--verbose-<tag>`)
    pub verbose_tags: HashSet<String>,
    /// `--debug-all`
    pub debug_all: bool,
    /// `--verbose`, verbose output for every tag
    pub verbose_all: bool,
    /// Write to the log file in addition to the console
    pub file_logging: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            debug_all: false,
            verbose_all: false,
            file_logging: true,
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

/// Build the logger configuration from an argument list
pub fn config_from_args(args: &[String]) -> LoggerConfig {
    let mut config = LoggerConfig::default();

    for arg in args {
        if arg == "--verbose" {
            config.min_level = LogLevel::Verbose;
            config.verbose_all = true;
        } else if arg == "--quiet" {
            config.min_level = LogLevel::Warning;
        } else if arg == "--debug-all" {
            config.debug_all = true;
            if config.min_level < LogLevel::Debug {
                config.min_level = LogLevel::Debug;
            }
        } else if arg == "--no-log-file" {
            config.file_logging = false;
        } else if let Some(tag) = arg.strip_prefix("--debug-") {
            config.debug_tags.insert(tag.to_lowercase());
            if config.min_level < LogLevel::Debug {
                config.min_level = LogLevel::Debug;
            }
        } else if let Some(tag) = arg.strip_prefix("--verbose-") {
            config.verbose_tags.insert(tag.to_lowercase());
        } else if let Some(level) = arg.strip_prefix("--log-level=") {
            if let Some(level) = LogLevel::from_str(level) {
                config.min_level = level;
                config.verbose_all = level == LogLevel::Verbose;
            }
        }
    }

    // Per-tag verbose must pass the threshold check in core
    if !config.verbose_tags.is_empty() {
        config.min_level = LogLevel::Verbose.max(config.min_level);
    }

    config
}

/// Initialize configuration from the process arguments
pub fn init_from_args() {
    set_logger_config(config_from_args(&get_cmd_args()));
}

impl LoggerConfig {
    pub fn is_debug_enabled_for_tag(&self, tag: &LogTag) -> bool {
        self.debug_all || self.debug_tags.contains(&tag.to_debug_key())
    }

    pub fn is_verbose_enabled_for_tag(&self, tag: &LogTag) -> bool {
        self.verbose_all || self.verbose_tags.contains(&tag.to_debug_key())
    }
}
