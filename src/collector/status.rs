// Collector health snapshot

use super::report::{CollectionReport, PoolReport};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectorStatus {
    pub rounds_completed: u64,
    pub last_round_started_at: Option<DateTime<Utc>>,
    pub last_round_finished_at: Option<DateTime<Utc>>,
    pub last_outcomes: Vec<PoolReport>,
    /// Failed rounds in a row, keyed by pool address
    pub consecutive_failures: BTreeMap<String, u32>,
}

impl CollectorStatus {
    pub fn record(&mut self, report: &CollectionReport) {
        self.rounds_completed += 1;
        self.last_round_started_at = Some(report.started_at);
        self.last_round_finished_at = Some(report.finished_at);

        for pool in &report.pools {
            let streak = self
                .consecutive_failures
                .entry(pool.address.clone())
                .or_insert(0);
            if pool.outcome.is_success() {
                *streak = 0;
            } else {
                *streak += 1;
            }
        }

        self.last_outcomes = report.pools.clone();
    }
}
