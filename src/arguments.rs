/// Centralized argument handling
///
/// Stores the process arguments once so any module can check flags without
/// threading them through constructors. Binaries and tests can override the
/// stored arguments with `set_cmd_args`.
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value following a flag, supporting both `--flag value` and `--flag=value`
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    let prefix = format!("{}=", flag);
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        if let Some(value) = arg.strip_prefix(&prefix) {
            return Some(value.to_string());
        }
    }
    None
}

// =============================================================================
// FLAGS
// =============================================================================

pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

/// Run a single collection round, print the report and exit
pub fn is_collect_once_enabled() -> bool {
    has_arg("--collect-once")
}

/// Serve the API without starting the collector
pub fn is_api_only_enabled() -> bool {
    has_arg("--api-only")
}

/// Config file path override
pub fn get_config_path() -> Option<String> {
    get_arg_value("--config")
}

/// Print usage to stdout
pub fn print_help() {
    println!("poolcandles - on-chain pool price collector and OHLCV API");
    println!();
    println!("USAGE:");
    println!("    poolcandles [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --config <PATH>       Config file (default: data/config.toml)");
    println!("    --collect-once        Run one collection round and exit");
    println!("    --api-only            Serve the API without collecting");
    println!("    --debug-<module>      Debug logs for collector, rpc, store, ohlcv, webserver, config");
    println!("    --debug-all           Debug logs for every module");
    println!("    --verbose             Verbose logs");
    println!("    --quiet               Only warnings and errors");
    println!("    --no-log-file         Do not write logs/poolcandles.log");
    println!("    -h, --help            Print this help");
}
