// SQLite-backed sample store

use super::types::{PriceSample, SortOrder};
use super::SampleStore;
use crate::errors::{StoreError, StoreResult};
use crate::logger::{self, LogTag};
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::Duration;

const SAMPLE_COLUMNS: &str = "pool_address, token_name, price, timestamp_ms, created_at_ms";

pub struct SqliteSampleStore {
    conn: Mutex<Connection>,
}

impl SqliteSampleStore {
    /// Open (or create) the database file and ensure the table exists
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Unavailable(format!(
                        "failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        logger::debug(
            LogTag::Store,
            &format!("Opened sample store {} (journal_mode={})", path.display(), mode),
        );

        Self::with_connection(conn)
    }

    /// Private in-memory database, used by tests and one-shot tools
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS price_data (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                pool_address TEXT NOT NULL,
                token_name TEXT NOT NULL,
                price REAL NOT NULL,
                timestamp_ms INTEGER NOT NULL,
                created_at_ms INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_price_token_time ON price_data(token_name, timestamp_ms);
            "#,
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_sample(row: &Row<'_>) -> rusqlite::Result<(String, String, f64, i64, i64)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
    }

    fn build_sample(raw: (String, String, f64, i64, i64)) -> StoreResult<PriceSample> {
        let (pool_address, token_name, price, timestamp_ms, created_at_ms) = raw;
        Ok(PriceSample {
            pool_address,
            token_name,
            price,
            timestamp: millis_to_datetime(timestamp_ms)?,
            created_at: millis_to_datetime(created_at_ms)?,
        })
    }
}

fn millis_to_datetime(ms: i64) -> StoreResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| StoreError::Corrupt(format!("timestamp out of range: {}", ms)))
}

impl SampleStore for SqliteSampleStore {
    fn insert_sample(&self, sample: &PriceSample) -> StoreResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            &format!("INSERT INTO price_data ({}) VALUES (?1, ?2, ?3, ?4, ?5)", SAMPLE_COLUMNS),
            params![
                &sample.pool_address,
                &sample.token_name,
                sample.price,
                sample.timestamp.timestamp_millis(),
                sample.created_at.timestamp_millis()
            ],
        )?;
        Ok(())
    }

    fn query_samples(
        &self,
        token: &str,
        from: DateTime<Utc>,
        order: SortOrder,
    ) -> StoreResult<Vec<PriceSample>> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {} FROM price_data
             WHERE token_name = ?1 AND timestamp_ms >= ?2
             ORDER BY timestamp_ms {order}, id {order}",
            SAMPLE_COLUMNS,
            order = order.as_sql()
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![token, from.timestamp_millis()], Self::row_to_sample)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(Self::build_sample).collect()
    }

    fn query_latest(
        &self,
        token: &str,
        at_or_before: Option<DateTime<Utc>>,
    ) -> StoreResult<Option<PriceSample>> {
        let conn = self.conn.lock();
        let raw = match at_or_before {
            Some(limit) => conn
                .query_row(
                    &format!(
                        "SELECT {} FROM price_data
                         WHERE token_name = ?1 AND timestamp_ms <= ?2
                         ORDER BY timestamp_ms DESC, id DESC LIMIT 1",
                        SAMPLE_COLUMNS
                    ),
                    params![token, limit.timestamp_millis()],
                    Self::row_to_sample,
                )
                .optional()?,
            None => conn
                .query_row(
                    &format!(
                        "SELECT {} FROM price_data
                         WHERE token_name = ?1
                         ORDER BY timestamp_ms DESC, id DESC LIMIT 1",
                        SAMPLE_COLUMNS
                    ),
                    params![token],
                    Self::row_to_sample,
                )
                .optional()?,
        };

        raw.map(Self::build_sample).transpose()
    }

    fn prune_before(&self, cutoff: DateTime<Utc>) -> StoreResult<usize> {
        let conn = self.conn.lock();
        let deleted = conn.execute(
            "DELETE FROM price_data WHERE timestamp_ms < ?1",
            params![cutoff.timestamp_millis()],
        )?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn sample(token: &str, price: f64, secs: i64) -> PriceSample {
        PriceSample::new("0xpool", token, price, at(secs))
    }

    #[test]
    fn test_insert_and_query_range() {
        let store = SqliteSampleStore::open_in_memory().unwrap();
        store.insert_sample(&sample("WATER", 1.0, 0)).unwrap();
        store.insert_sample(&sample("WATER", 2.0, 60)).unwrap();
        store.insert_sample(&sample("WATER", 3.0, 120)).unwrap();
        store.insert_sample(&sample("COAL", 9.0, 60)).unwrap();

        let asc = store.query_samples("WATER", at(60), SortOrder::Ascending).unwrap();
        let prices: Vec<f64> = asc.iter().map(|s| s.price).collect();
        assert_eq!(prices, vec![2.0, 3.0]);
        assert_eq!(asc[0].timestamp, at(60));
        assert_eq!(asc[0].token_name, "WATER");

        let desc = store.query_samples("WATER", at(0), SortOrder::Descending).unwrap();
        let prices: Vec<f64> = desc.iter().map(|s| s.price).collect();
        assert_eq!(prices, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_query_latest() {
        let store = SqliteSampleStore::open_in_memory().unwrap();
        assert!(store.query_latest("WATER", None).unwrap().is_none());

        store.insert_sample(&sample("WATER", 1.0, 0)).unwrap();
        store.insert_sample(&sample("WATER", 2.0, 100)).unwrap();

        let latest = store.query_latest("WATER", None).unwrap().unwrap();
        assert_eq!(latest.price, 2.0);

        let before = store.query_latest("WATER", Some(at(99))).unwrap().unwrap();
        assert_eq!(before.price, 1.0);

        // Boundary is inclusive
        let exact = store.query_latest("WATER", Some(at(100))).unwrap().unwrap();
        assert_eq!(exact.price, 2.0);

        assert!(store.query_latest("WATER", Some(at(-1))).unwrap().is_none());
    }

    #[test]
    fn test_prune_before() {
        let store = SqliteSampleStore::open_in_memory().unwrap();
        for i in 0..5 {
            store.insert_sample(&sample("WATER", i as f64, i * 60)).unwrap();
        }

        let deleted = store.prune_before(at(120)).unwrap();
        assert_eq!(deleted, 2);

        let remaining = store
            .query_samples("WATER", at(0) - ChronoDuration::days(1), SortOrder::Ascending)
            .unwrap();
        assert_eq!(remaining.len(), 3);
        assert_eq!(remaining[0].price, 2.0);
    }

    #[test]
    fn test_on_disk_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prices.db");

        {
            let store = SqliteSampleStore::open(&path).unwrap();
            store.insert_sample(&sample("CRYSTAL", 0.5, 0)).unwrap();
        }

        let reopened = SqliteSampleStore::open(&path).unwrap();
        let latest = reopened.query_latest("CRYSTAL", None).unwrap().unwrap();
        assert_eq!(latest.price, 0.5);
        assert_eq!(latest.pool_address, "0xpool");
    }
}
