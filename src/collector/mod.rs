//! Periodic pool price collection
//!
//! One round walks the configured pools in order: fetch the object state,
//! decode it, convert the square-root price and append a sample. A failing pool
//! is recorded in the round report and the round moves on. Pools are spaced by
//! a fixed delay, which is the only rate limit against the RPC node.

mod report;
mod status;

pub use report::{CollectionReport, PoolOutcome, PoolReport};
pub use status::CollectorStatus;

use crate::config::{Config, PoolConfig};
use crate::errors::{CollectError, RpcError};
use crate::logger::{self, LogTag};
use crate::pool_price::{decode_pool_fields, PriceConverter};
use crate::rpc::PoolStateReader;
use crate::store::{PriceSample, SampleStore};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};
use tokio::time::{interval, sleep, Duration, MissedTickBehavior};

#[derive(Debug, Clone, PartialEq)]
pub struct CollectorSettings {
    /// Period between round starts
    pub interval: Duration,
    /// Pause between two consecutive pools
    pub pool_delay: Duration,
    /// Upper bound on a single pool fetch
    pub fetch_timeout: Duration,
    /// Samples older than this are pruned after each round
    pub retention: Option<chrono::Duration>,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            pool_delay: Duration::from_millis(1000),
            fetch_timeout: Duration::from_secs(10),
            retention: None,
        }
    }
}

impl CollectorSettings {
    pub fn from_config(config: &Config) -> Self {
        let retention = match config.database.retention_days {
            0 => None,
            days => Some(chrono::Duration::days(i64::from(days))),
        };

        Self {
            interval: Duration::from_secs(config.collector.interval_secs),
            pool_delay: Duration::from_millis(config.collector.pool_delay_ms),
            fetch_timeout: Duration::from_secs(config.rpc.timeout_secs),
            retention,
        }
    }
}

pub struct Collector {
    pools: Vec<PoolConfig>,
    reader: Arc<dyn PoolStateReader>,
    store: Arc<dyn SampleStore>,
    settings: CollectorSettings,
    status: RwLock<CollectorStatus>,
}

impl Collector {
    pub fn new(
        pools: Vec<PoolConfig>,
        reader: Arc<dyn PoolStateReader>,
        store: Arc<dyn SampleStore>,
        settings: CollectorSettings,
    ) -> Self {
        Self {
            pools,
            reader,
            store,
            settings,
            status: RwLock::new(CollectorStatus::default()),
        }
    }

    pub fn pools(&self) -> &[PoolConfig] {
        &self.pools
    }

    /// Snapshot of the health published after the last round
    pub async fn status(&self) -> CollectorStatus {
        self.status.read().await.clone()
    }

    /// Run one round over every pool; never fails
    pub async fn run_once(&self) -> CollectionReport {
        let started_at = Utc::now();
        let mut pools = Vec::with_capacity(self.pools.len());

        for (index, pool) in self.pools.iter().enumerate() {
            let result = self.collect_pool(pool).await;

            match &result {
                Ok(price) => logger::debug(
                    LogTag::Collector,
                    &format!("{} ({}): price {}", pool.name, pool.address, price),
                ),
                Err(e) => logger::warning(
                    LogTag::Collector,
                    &format!("{} ({}) failed at {}: {}", pool.name, pool.address, e.stage(), e),
                ),
            }

            pools.push(PoolReport {
                address: pool.address.clone(),
                name: pool.name.clone(),
                outcome: PoolOutcome::from(result),
            });

            if index + 1 < self.pools.len() && !self.settings.pool_delay.is_zero() {
                sleep(self.settings.pool_delay).await;
            }
        }

        let report = CollectionReport {
            started_at,
            finished_at: Utc::now(),
            pools,
        };

        self.status.write().await.record(&report);
        self.prune_expired();

        report
    }

    async fn collect_pool(&self, pool: &PoolConfig) -> Result<f64, CollectError> {
        let fetch = self.reader.get_object_state(&pool.address);
        let fields = match tokio::time::timeout(self.settings.fetch_timeout, fetch).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(RpcError::Transient(format!(
                    "fetch timed out after {}ms",
                    self.settings.fetch_timeout.as_millis()
                ))
                .into())
            }
        };
        let sampled_at = Utc::now();

        let state = decode_pool_fields(&fields)?;
        logger::verbose(
            LogTag::Collector,
            &format!(
                "{}: sqrt_price={} liquidity={:?} tick={:?}",
                pool.name, state.sqrt_price_x64, state.liquidity, state.tick_index
            ),
        );

        let price = PriceConverter::convert(
            state.sqrt_price_x64,
            pool.token_a_decimals,
            pool.token_b_decimals,
        )?;

        let sample = PriceSample::new(&pool.address, &pool.token_name(), price, sampled_at);
        self.store.insert_sample(&sample)?;

        Ok(price)
    }

    fn prune_expired(&self) {
        let Some(retention) = self.settings.retention else {
            return;
        };

        let Some(cutoff) = Utc::now().checked_sub_signed(retention) else {
            logger::warning(
                LogTag::Store,
                &format!("Retention of {} days is out of range, pruning skipped", retention.num_days()),
            );
            return;
        };

        match self.store.prune_before(cutoff) {
            Ok(0) => {}
            Ok(deleted) => logger::debug(
                LogTag::Store,
                &format!("Pruned {} samples older than {}", deleted, cutoff),
            ),
            Err(e) => logger::warning(LogTag::Store, &format!("Pruning failed: {}", e)),
        }
    }

    /// Collection loop: a round at start, then one per period until shutdown
    ///
    /// Rounds are awaited inline, so they never overlap. Ticks missed by an
    /// overrunning round are skipped. Shutdown is observed between rounds.
    pub async fn run(self: Arc<Self>, shutdown: Arc<Notify>) {
        let period = self.settings.interval.max(Duration::from_millis(1));
        let mut tick = interval(period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        logger::info(
            LogTag::Collector,
            &format!(
                "Collector started ({} pools, interval={}s, pool_delay={}ms)",
                self.pools.len(),
                period.as_secs(),
                self.settings.pool_delay.as_millis()
            ),
        );

        loop {
            tokio::select! {
                _ = shutdown.notified() => {
                    logger::info(LogTag::Collector, "Collector shutting down");
                    break;
                }
                _ = tick.tick() => {
                    let report = self.run_once().await;
                    if report.failed() > 0 {
                        logger::warning(LogTag::Collector, &format!("Round finished: {}", report.summary()));
                    } else {
                        logger::info(LogTag::Collector, &format!("Round finished: {}", report.summary()));
                    }
                }
            }
        }
    }
}
