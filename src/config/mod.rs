//! Configuration system
//!
//! TOML file with embedded defaults (`config_struct!`), environment overrides
//! for deployment, and validation at startup.

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{CollectorConfig, Config, DatabaseConfig, PoolConfig, RpcConfig, WebserverConfig};
pub use utils::{load_config_from_path, read_config_file, with_config, CONFIG_FILE_PATH};
