//! Price sample storage
//!
//! The collector appends samples and the query side reads them back. The two
//! never share in-process state, only this store.

mod sqlite;
mod types;

pub use sqlite::SqliteSampleStore;
pub use types::{PriceSample, SortOrder};

use crate::errors::StoreResult;
use chrono::{DateTime, Utc};

/// Append-only time series of price samples
///
/// Implementations must make a completed `insert_sample` visible to every
/// later read.
pub trait SampleStore: Send + Sync {
    fn insert_sample(&self, sample: &PriceSample) -> StoreResult<()>;

    /// Samples for `token` with `timestamp >= from`
    fn query_samples(
        &self,
        token: &str,
        from: DateTime<Utc>,
        order: SortOrder,
    ) -> StoreResult<Vec<PriceSample>>;

    /// Most recent sample for `token`, optionally restricted to `timestamp <= at_or_before`
    fn query_latest(
        &self,
        token: &str,
        at_or_before: Option<DateTime<Utc>>,
    ) -> StoreResult<Option<PriceSample>>;

    /// Delete samples older than `cutoff`, returning how many were removed
    fn prune_before(&self, cutoff: DateTime<Utc>) -> StoreResult<usize>;
}
