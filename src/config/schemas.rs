/// Configuration schemas - all config structures defined once with defaults
use crate::config_struct;
use crate::errors::ConfigError;
use crate::pool_price::MAX_DECIMALS;
use serde::{Deserialize, Serialize};

/// Upper bound on `database.retention_days` (100 years)
pub const MAX_RETENTION_DAYS: u32 = 36_500;

// ============================================================================
// RPC CONFIGURATION
// ============================================================================

config_struct! {
    /// Sui full node JSON-RPC endpoint
    pub struct RpcConfig {
        url: String = "https://fullnode.mainnet.sui.io:443".to_string(),
        /// Per-request timeout, also bounds each pool fetch in the collector
        timeout_secs: u64 = 10,
    }
}

// ============================================================================
// COLLECTOR CONFIGURATION
// ============================================================================

config_struct! {
    /// Price collection loop
    pub struct CollectorConfig {
        enabled: bool = true,
        /// Period between rounds
        interval_secs: u64 = 60,
        /// Pause between two pools of the same round
        pool_delay_ms: u64 = 1000,
    }
}

// ============================================================================
// DATABASE CONFIGURATION
// ============================================================================

config_struct! {
    pub struct DatabaseConfig {
        path: String = "data/prices.db".to_string(),
        /// Samples older than this are pruned after each round, 0 keeps everything
        retention_days: u32 = 0,
    }
}

// ============================================================================
// WEBSERVER CONFIGURATION
// ============================================================================

config_struct! {
    pub struct WebserverConfig {
        enabled: bool = true,
        host: String = "0.0.0.0".to_string(),
        port: u16 = 3000,
    }
}

// ============================================================================
// POOLS
// ============================================================================

/// One monitored pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Chain object id of the pool
    pub address: String,
    /// Token symbol the samples are stored under
    pub name: String,
    pub token_a_decimals: u8,
    pub token_b_decimals: u8,
}

impl PoolConfig {
    pub fn new(address: &str, name: &str, token_a_decimals: u8, token_b_decimals: u8) -> Self {
        Self {
            address: address.to_string(),
            name: name.to_string(),
            token_a_decimals,
            token_b_decimals,
        }
    }

    /// Symbol as stored and queried
    pub fn token_name(&self) -> String {
        self.name.to_uppercase()
    }
}

// ============================================================================
// ROOT
// ============================================================================

config_struct! {
    /// Root configuration, one section per subsystem
    pub struct Config {
        rpc: RpcConfig = RpcConfig::default(),
        collector: CollectorConfig = CollectorConfig::default(),
        database: DatabaseConfig = DatabaseConfig::default(),
        webserver: WebserverConfig = WebserverConfig::default(),
        pools: Vec<PoolConfig> = Vec::new(),
    }
}

impl Config {
    /// Reject configurations the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pools.is_empty() && self.collector.enabled {
            return Err(ConfigError::Invalid("no pools configured".to_string()));
        }

        if self.collector.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "collector.interval_secs must be positive".to_string(),
            ));
        }

        if self.database.retention_days > MAX_RETENTION_DAYS {
            return Err(ConfigError::Invalid(format!(
                "database.retention_days must be at most {}",
                MAX_RETENTION_DAYS
            )));
        }

        if self.rpc.timeout_secs == 0 {
            return Err(ConfigError::Invalid("rpc.timeout_secs must be positive".to_string()));
        }

        for (index, pool) in self.pools.iter().enumerate() {
            if pool.address.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("pools[{}]: empty address", index)));
            }
            if pool.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("pools[{}]: empty name", index)));
            }
            if pool.token_a_decimals > MAX_DECIMALS || pool.token_b_decimals > MAX_DECIMALS {
                return Err(ConfigError::Invalid(format!(
                    "pools[{}] ({}): decimals must be within 0..={}",
                    index, pool.name, MAX_DECIMALS
                )));
            }
        }

        Ok(())
    }

    /// Apply `RPC_URL` (or `SUI_RPC_URL`) and `PORT` environment overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; `RPC_URL` wins over `SUI_RPC_URL`
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = ["RPC_URL", "SUI_RPC_URL"]
            .iter()
            .filter_map(|key| lookup(key))
            .find(|url| !url.trim().is_empty());
        if let Some(url) = url {
            self.rpc.url = url.trim().to_string();
        }

        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
            self.webserver.port = port;
        }
    }
}
