/// Log tags identifying the subsystem a message comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Collector,
    Rpc,
    Store,
    Ohlcv,
    Webserver,
}

impl LogTag {
    /// Key used by `--debug-<key>` flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Collector => "collector".to_string(),
            LogTag::Rpc => "rpc".to_string(),
            LogTag::Store => "store".to_string(),
            LogTag::Ohlcv => "ohlcv".to_string(),
            LogTag::Webserver => "webserver".to_string(),
        }
    }

    /// Uncolored label used in the log file
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::System => "SYSTEM".to_string(),
            LogTag::Config => "CONFIG".to_string(),
            LogTag::Collector => "COLLECTOR".to_string(),
            LogTag::Rpc => "RPC".to_string(),
            LogTag::Store => "STORE".to_string(),
            LogTag::Ohlcv => "OHLCV".to_string(),
            LogTag::Webserver => "WEBSERVER".to_string(),
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
