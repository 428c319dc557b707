pub mod arguments;
pub mod collector;
pub mod config;
pub mod errors;
pub mod logger;
pub mod ohlcvs;
pub mod pool_price;
pub mod query;
pub mod rpc;
pub mod store;

#[cfg(feature = "web")]
pub mod webserver;

#[cfg(test)]
pub(crate) mod testing;
