use serde::{Deserialize, Serialize};

// =============================================================================
// CONSTANTS
// =============================================================================

/// 2^64, the scale of Q64.64 fixed-point square-root prices
pub const Q64: f64 = 18_446_744_073_709_551_616.0;

/// Largest token decimal precision accepted by the checked converter
pub const MAX_DECIMALS: u8 = 30;

// =============================================================================
// RAW POOL STATE
// =============================================================================

/// Concentrated-liquidity pool state as read from the chain
///
/// Only `sqrt_price_x64` feeds the price. The remaining fields are decoded
/// when present and carried for logging and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPoolState {
    pub sqrt_price_x64: u128,
    pub liquidity: Option<u128>,
    pub tick_index: Option<i32>,
    pub fee_growth_global_a: Option<u128>,
    pub fee_growth_global_b: Option<u128>,
}
