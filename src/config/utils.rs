/// Configuration loading and global access
use super::schemas::Config;
use crate::errors::ConfigError;
use crate::logger::{self, LogTag};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::RwLock;

/// Global configuration instance, set once by the binaries at startup
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Default configuration file path
pub const CONFIG_FILE_PATH: &str = "data/config.toml";

/// Read and parse a configuration file
///
/// A missing file yields the defaults, which only pass validation when the
/// collector is disabled.
pub fn read_config_file(path: &str) -> Result<Config, ConfigError> {
    if !Path::new(path).exists() {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path),
        );
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;

    toml::from_str::<Config>(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

/// Load, override from environment, validate, and install the global config
pub fn load_config_from_path(path: &str) -> Result<Config, ConfigError> {
    let mut config = read_config_file(path)?;
    config.apply_env_overrides();
    config.validate()?;

    CONFIG
        .set(RwLock::new(config.clone()))
        .map_err(|_| ConfigError::AlreadyInitialized)?;

    logger::debug(
        LogTag::Config,
        &format!("Loaded config from '{}' ({} pools)", path, config.pools.len()),
    );

    Ok(config)
}

/// Run a closure with read access to the global config
///
/// Returns `None` before the config is loaded.
pub fn with_config<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&Config) -> R,
{
    let lock = CONFIG.get()?;
    let guard = lock.read().ok()?;
    Some(f(&guard))
}
