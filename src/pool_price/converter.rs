/// Square-root price conversion
///
/// Concentrated-liquidity pools store `sqrt(price) * 2^64` where price is token
/// B base units per token A base unit. The human-scale price is
/// `(sqrt_price_x64 / 2^64)^2 * 10^(decimals_a - decimals_b)`.
use super::types::{MAX_DECIMALS, Q64};
use crate::errors::CollectError;

/// Convert a Q64.64 square-root price to a decimal-adjusted spot price
///
/// Divides before squaring so that values near 2^64 and above keep full f64
/// relative precision. Never fails; use [`PriceConverter::convert`] for
/// validated input.
pub fn sqrt_price_x64_to_price(sqrt_price_x64: u128, decimals_a: u8, decimals_b: u8) -> f64 {
    let sqrt_price = (sqrt_price_x64 as f64) / Q64;
    let raw_price = sqrt_price * sqrt_price;
    let exponent = i32::from(decimals_a) - i32::from(decimals_b);
    raw_price * 10f64.powi(exponent)
}

pub struct PriceConverter;

impl PriceConverter {
    /// Checked conversion used by the collector
    ///
    /// Rejects decimals above [`MAX_DECIMALS`] and any result that is not a
    /// finite non-negative number. A zero square-root price converts to 0.
    pub fn convert(sqrt_price_x64: u128, decimals_a: u8, decimals_b: u8) -> Result<f64, CollectError> {
        if decimals_a > MAX_DECIMALS || decimals_b > MAX_DECIMALS {
            return Err(CollectError::MalformedState(format!(
                "decimals out of range: a={} b={} (max {})",
                decimals_a, decimals_b, MAX_DECIMALS
            )));
        }

        let price = sqrt_price_x64_to_price(sqrt_price_x64, decimals_a, decimals_b);
        if !price.is_finite() || price < 0.0 {
            return Err(CollectError::MalformedState(format!(
                "conversion produced invalid price {} from sqrt price {}",
                price, sqrt_price_x64
            )));
        }

        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_X64: u128 = 1u128 << 64;

    fn assert_close(actual: f64, expected: f64) {
        let rel = ((actual - expected) / expected).abs();
        assert!(rel < 1e-12, "expected {}, got {} (rel err {})", expected, actual, rel);
    }

    #[test]
    fn test_unit_sqrt_price_with_decimal_shift() {
        assert_close(sqrt_price_x64_to_price(ONE_X64, 6, 9), 0.001);
        assert_close(sqrt_price_x64_to_price(ONE_X64, 9, 6), 1000.0);
        assert_close(sqrt_price_x64_to_price(ONE_X64, 6, 6), 1.0);
    }

    #[test]
    fn test_squares_ratio() {
        // sqrt = 2 -> price 4, sqrt = 0.5 -> price 0.25
        assert_close(sqrt_price_x64_to_price(ONE_X64 * 2, 0, 0), 4.0);
        assert_close(sqrt_price_x64_to_price(ONE_X64 / 2, 0, 0), 0.25);
    }

    #[test]
    fn test_large_sqrt_price_keeps_precision() {
        // sqrt = 2^40 -> price 2^80, far beyond u128 squaring range
        let sqrt = ONE_X64 << 40;
        assert_close(sqrt_price_x64_to_price(sqrt, 0, 0), 2f64.powi(80));
    }

    #[test]
    fn test_checked_conversion() {
        assert_close(PriceConverter::convert(ONE_X64, 6, 9).unwrap(), 0.001);

        assert_eq!(PriceConverter::convert(0, 6, 9).unwrap(), 0.0);
        assert!(matches!(
            PriceConverter::convert(ONE_X64, 31, 9),
            Err(CollectError::MalformedState(_))
        ));
        assert!(PriceConverter::convert(ONE_X64, 30, 0).is_ok());
    }
}
