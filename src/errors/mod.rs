/// Structured error types for poolcandles
///
/// Collection failures are recorded per pool and never escape a round.
/// Query failures propagate to the caller. Configuration failures are the only
/// ones that stop the process.
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// RPC ERRORS
// =============================================================================

/// Failure while reading pool state from the chain
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RpcError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("transient RPC failure: {0}")]
    Transient(String),

    #[error("malformed RPC response: {0}")]
    Malformed(String),
}

impl RpcError {
    pub fn is_transient(&self) -> bool {
        matches!(self, RpcError::Transient(_))
    }
}

// =============================================================================
// STORE ERRORS
// =============================================================================

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// COLLECTION ERRORS
// =============================================================================

/// Stage of the per-pool pipeline at which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectStage {
    Fetch,
    Convert,
    Persist,
}

impl CollectStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectStage::Fetch => "fetch",
            CollectStage::Convert => "convert",
            CollectStage::Persist => "persist",
        }
    }
}

impl std::fmt::Display for CollectStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] RpcError),

    #[error("malformed pool state: {0}")]
    MalformedState(String),

    #[error("store write failed: {0}")]
    Store(#[from] StoreError),
}

impl CollectError {
    pub fn stage(&self) -> CollectStage {
        match self {
            CollectError::Fetch(_) => CollectStage::Fetch,
            CollectError::MalformedState(_) => CollectStage::Convert,
            CollectError::Store(_) => CollectStage::Persist,
        }
    }
}

// =============================================================================
// QUERY ERRORS
// =============================================================================

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("No data found for token {0}")]
    NoData(String),

    #[error("store read failed: {0}")]
    Store(#[from] StoreError),
}

pub type QueryResult<T> = Result<T, QueryError>;

// =============================================================================
// CONFIGURATION ERRORS
// =============================================================================

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("config already initialized")]
    AlreadyInitialized,
}
