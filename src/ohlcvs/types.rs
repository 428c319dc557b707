// Core types for the OHLCV module

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported candle resolutions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Day1,
}

impl Interval {
    pub const DEFAULT: Interval = Interval::Hour1;

    /// Width of one candle in minutes
    pub fn minutes(&self) -> u32 {
        match self {
            Interval::Minute1 => 1,
            Interval::Minute5 => 5,
            Interval::Minute15 => 15,
            Interval::Hour1 => 60,
            Interval::Hour4 => 240,
            Interval::Day1 => 1440,
        }
    }

    pub fn all() -> Vec<Interval> {
        vec![
            Interval::Minute1,
            Interval::Minute5,
            Interval::Minute15,
            Interval::Hour1,
            Interval::Hour4,
            Interval::Day1,
        ]
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Interval> {
        match s {
            "1m" => Some(Interval::Minute1),
            "5m" => Some(Interval::Minute5),
            "15m" => Some(Interval::Minute15),
            "1h" => Some(Interval::Hour1),
            "4h" => Some(Interval::Hour4),
            "1d" => Some(Interval::Day1),
            _ => None,
        }
    }

    /// Parse from string, unknown names resolve to 1h
    pub fn from_name(s: &str) -> Interval {
        Self::from_str(s).unwrap_or(Self::DEFAULT)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Hour1 => "1h",
            Interval::Hour4 => "4h",
            Interval::Day1 => "1d",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregator input: one price at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// One OHLCV candle, `time` is the bucket start in epoch seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Validates that the candle is internally consistent
    pub fn is_valid(&self) -> bool {
        self.high >= self.low
            && self.open >= self.low
            && self.open <= self.high
            && self.close >= self.low
            && self.close <= self.high
            && self.volume >= 0.0
    }
}
