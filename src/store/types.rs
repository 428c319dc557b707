use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted price observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub pool_address: String,
    /// Upper-cased token symbol
    pub token_name: String,
    pub price: f64,
    /// When the pool state was sampled
    pub timestamp: DateTime<Utc>,
    /// When the row was written
    pub created_at: DateTime<Utc>,
}

impl PriceSample {
    pub fn new(pool_address: &str, token_name: &str, price: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            pool_address: pool_address.to_string(),
            token_name: token_name.to_uppercase(),
            price,
            timestamp,
            created_at: Utc::now(),
        }
    }
}

/// Result ordering by sample timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}
