//! Chain object reads
//!
//! The collector only sees `PoolStateReader`. `SuiRpcClient` is the JSON-RPC
//! implementation used by the binaries.

mod client;

pub use client::{parse_get_object_response, SuiRpcClient};

use crate::errors::RpcError;
use async_trait::async_trait;

/// Reads the current field map of a pool object
#[async_trait]
pub trait PoolStateReader: Send + Sync {
    /// Returns the Move object's `content.fields` map
    async fn get_object_state(&self, address: &str) -> Result<serde_json::Value, RpcError>;
}
