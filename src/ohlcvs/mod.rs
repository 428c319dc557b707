//! OHLCV candle construction
//!
//! Candles are never stored. They are rebuilt from raw price samples on every
//! request, at whatever resolution the caller asks for.

pub mod aggregator;
pub mod types;

pub use aggregator::OhlcvAggregator;
pub use types::{Candle, Interval, PricePoint};
