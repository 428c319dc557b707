//! Log formatting and output with ANSI colors
//!
//! Handles:
//! - Colorized console output with tag and level formatting
//! - Dual output (console + file)
//! - Broken pipe handling for piped commands

use super::config::get_logger_config;
use super::file::write_to_file;
use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

/// Log format widths for alignment
const TAG_WIDTH: usize = 10;
const LEVEL_WIDTH: usize = 7;

/// Format and output a log message
pub fn format_and_log(tag: LogTag, level: LogLevel, message: &str) {
    let now = Local::now();
    let time = now.format("%H:%M:%S").to_string();

    let console_line = format!(
        "{} [{}] [{}] {}",
        time.dimmed(),
        format_tag(&tag),
        format_level(level),
        message
    );

    if level <= LogLevel::Warning {
        print_stderr_safe(&console_line);
    } else {
        print_stdout_safe(&console_line);
    }

    if get_logger_config().file_logging {
        let file_line = format!(
            "{} [{}] [{}] {}",
            now.format("%Y-%m-%d %H:%M:%S"),
            tag.to_plain_string(),
            level.as_str(),
            message
        );
        write_to_file(&file_line);
    }
}

/// Format a tag with appropriate color
fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Config => label.bright_white().bold(),
        LogTag::Collector => label.bright_cyan().bold(),
        LogTag::Rpc => label.bright_blue().bold(),
        LogTag::Store => label.bright_magenta().bold(),
        LogTag::Ohlcv => label.bright_green().bold(),
        LogTag::Webserver => label.green().bold(),
    }
}

fn format_level(level: LogLevel) -> ColoredString {
    let label = format!("{:<width$}", level.as_str(), width = LEVEL_WIDTH);
    match level {
        LogLevel::Error => label.bright_red().bold(),
        LogLevel::Warning => label.yellow().bold(),
        LogLevel::Info => label.white().bold(),
        LogLevel::Debug => label.bright_black(),
        LogLevel::Verbose => label.dimmed(),
    }
}

/// Print to stdout but ignore broken pipe errors
fn print_stdout_safe(message: &str) {
    let mut out = stdout().lock();
    if let Err(e) = writeln!(out, "{}", message).and_then(|_| out.flush()) {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        let _ = writeln!(std::io::stderr(), "Logger stdout error: {}", e);
    }
}

fn print_stderr_safe(message: &str) {
    let _ = writeln!(std::io::stderr(), "{}", message);
}
