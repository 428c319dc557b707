// Per-round collection report

use crate::errors::{CollectError, CollectStage};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PoolOutcome {
    Success { price: f64 },
    Failure { stage: CollectStage, reason: String },
}

impl PoolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PoolOutcome::Success { .. })
    }
}

impl From<Result<f64, CollectError>> for PoolOutcome {
    fn from(result: Result<f64, CollectError>) -> Self {
        match result {
            Ok(price) => PoolOutcome::Success { price },
            Err(e) => PoolOutcome::Failure {
                stage: e.stage(),
                reason: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolReport {
    pub address: String,
    pub name: String,
    pub outcome: PoolOutcome,
}

/// Outcome of one pass over every configured pool, in configured order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub pools: Vec<PoolReport>,
}

impl CollectionReport {
    pub fn succeeded(&self) -> usize {
        self.pools.iter().filter(|p| p.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.pools.len() - self.succeeded()
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    pub fn summary(&self) -> String {
        format!(
            "{}/{} pools collected in {}ms",
            self.succeeded(),
            self.pools.len(),
            self.duration_ms()
        )
    }
}
