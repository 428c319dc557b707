//! Pool price system
//!
//! Decodes raw pool state and converts square-root prices to spot prices.
//! Pure code, no I/O.

pub mod converter;
pub mod decoder;
pub mod types;

pub use converter::{sqrt_price_x64_to_price, PriceConverter};
pub use decoder::decode_pool_fields;
pub use types::{RawPoolState, MAX_DECIMALS, Q64};
