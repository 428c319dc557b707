//! In-memory fakes for the reader and store traits

use crate::errors::{RpcError, StoreError, StoreResult};
use crate::rpc::PoolStateReader;
use crate::store::{PriceSample, SampleStore, SortOrder};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Field map of a pool whose sqrt price is `sqrt_price_x64`
pub fn pool_fields(sqrt_price_x64: u128) -> Value {
    json!({
        "current_sqrt_price": sqrt_price_x64.to_string(),
        "liquidity": "1000000",
        "current_tick_index": { "type": "0x1::i32::I32", "fields": { "bits": 0 } }
    })
}

/// Reader that answers from a per-address script
#[derive(Default)]
pub struct FakeReader {
    responses: Mutex<HashMap<String, Result<Value, RpcError>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<String>>,
}

impl FakeReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, address: &str, response: Result<Value, RpcError>) {
        self.responses.lock().insert(address.to_string(), response);
    }

    pub fn delay(&self, address: &str, delay: Duration) {
        self.delays.lock().insert(address.to_string(), delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl PoolStateReader for FakeReader {
    async fn get_object_state(&self, address: &str) -> Result<Value, RpcError> {
        self.calls.lock().push(address.to_string());

        let delay = self.delays.lock().get(address).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .get(address)
            .cloned()
            .unwrap_or_else(|| Err(RpcError::NotFound(address.to_string())))
    }
}

/// Vec-backed store with optional injected failures
#[derive(Default)]
pub struct FakeStore {
    samples: Mutex<Vec<PriceSample>>,
    failing_pools: Mutex<HashSet<String>>,
    fail_reads: Mutex<bool>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(samples: Vec<PriceSample>) -> Self {
        let store = Self::default();
        *store.samples.lock() = samples;
        store
    }

    /// Inserts for this pool address fail
    pub fn fail_inserts_for(&self, pool_address: &str) {
        self.failing_pools.lock().insert(pool_address.to_string());
    }

    pub fn fail_reads(&self) {
        *self.fail_reads.lock() = true;
    }

    pub fn samples(&self) -> Vec<PriceSample> {
        self.samples.lock().clone()
    }

    fn check_reads(&self) -> StoreResult<()> {
        if *self.fail_reads.lock() {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(())
    }
}

impl SampleStore for FakeStore {
    fn insert_sample(&self, sample: &PriceSample) -> StoreResult<()> {
        if self.failing_pools.lock().contains(&sample.pool_address) {
            return Err(StoreError::Unavailable("insert rejected".to_string()));
        }
        self.samples.lock().push(sample.clone());
        Ok(())
    }

    fn query_samples(
        &self,
        token: &str,
        from: DateTime<Utc>,
        order: SortOrder,
    ) -> StoreResult<Vec<PriceSample>> {
        self.check_reads()?;
        let mut found: Vec<PriceSample> = self
            .samples
            .lock()
            .iter()
            .filter(|s| s.token_name == token && s.timestamp >= from)
            .cloned()
            .collect();
        found.sort_by_key(|s| s.timestamp);
        if order == SortOrder::Descending {
            found.reverse();
        }
        Ok(found)
    }

    fn query_latest(
        &self,
        token: &str,
        at_or_before: Option<DateTime<Utc>>,
    ) -> StoreResult<Option<PriceSample>> {
        self.check_reads()?;
        Ok(self
            .samples
            .lock()
            .iter()
            .filter(|s| s.token_name == token)
            .filter(|s| at_or_before.map_or(true, |limit| s.timestamp <= limit))
            .max_by_key(|s| s.timestamp)
            .cloned())
    }

    fn prune_before(&self, cutoff: DateTime<Utc>) -> StoreResult<usize> {
        let mut samples = self.samples.lock();
        let before = samples.len();
        samples.retain(|s| s.timestamp >= cutoff);
        Ok(before - samples.len())
    }
}
