/// Pool state decoder
///
/// Turns the Move object field map returned by the RPC reader into a
/// [`RawPoolState`]. Sui JSON encodes u128/u64 as strings, small integers as
/// numbers, and signed integers as `I32 { bits }` structs in two's complement.
use super::types::RawPoolState;
use crate::errors::CollectError;
use serde_json::Value;

/// Field names carrying the square-root price, in lookup order
const SQRT_PRICE_FIELDS: &[&str] = &["current_sqrt_price", "sqrt_price"];
const TICK_INDEX_FIELDS: &[&str] = &["current_tick_index", "tick_current_index"];

pub fn decode_pool_fields(fields: &Value) -> Result<RawPoolState, CollectError> {
    let map = fields.as_object().ok_or_else(|| {
        CollectError::MalformedState(format!("pool fields are not an object: {}", type_name(fields)))
    })?;

    let sqrt_value = SQRT_PRICE_FIELDS
        .iter()
        .find_map(|name| map.get(*name))
        .ok_or_else(|| {
            CollectError::MalformedState(format!(
                "missing sqrt price field (expected one of {:?})",
                SQRT_PRICE_FIELDS
            ))
        })?;

    let sqrt_price_x64 = parse_u128(sqrt_value)
        .ok_or_else(|| CollectError::MalformedState(format!("unparsable sqrt price: {}", sqrt_value)))?;

    let tick_index = TICK_INDEX_FIELDS
        .iter()
        .find_map(|name| map.get(*name))
        .and_then(parse_i32);

    Ok(RawPoolState {
        sqrt_price_x64,
        liquidity: map.get("liquidity").and_then(parse_u128),
        tick_index,
        fee_growth_global_a: map.get("fee_growth_global_a").and_then(parse_u128),
        fee_growth_global_b: map.get("fee_growth_global_b").and_then(parse_u128),
    })
}

/// Parse an unsigned integer encoded as a JSON string or number
fn parse_u128(value: &Value) -> Option<u128> {
    match value {
        Value::String(s) => s.trim().parse::<u128>().ok(),
        Value::Number(n) => n.as_u64().map(u128::from),
        _ => None,
    }
}

/// Parse a signed 32-bit integer, plain or wrapped as a Move `I32 { bits }`
fn parse_i32(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        Value::Object(obj) => {
            let bits = obj
                .get("fields")
                .and_then(|f| f.get("bits"))
                .or_else(|| obj.get("bits"))?;
            let bits = parse_u128(bits)?;
            u32::try_from(bits).ok().map(|b| b as i32)
        }
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_pool() {
        let fields = json!({
            "current_sqrt_price": "18446744073709551616",
            "liquidity": "123456789",
            "current_tick_index": { "type": "0x1::i32::I32", "fields": { "bits": 4294967286u64 } },
            "fee_growth_global_a": "10",
            "fee_growth_global_b": 20,
            "tick_spacing": 60
        });

        let state = decode_pool_fields(&fields).unwrap();
        assert_eq!(state.sqrt_price_x64, 1u128 << 64);
        assert_eq!(state.liquidity, Some(123_456_789));
        assert_eq!(state.tick_index, Some(-10));
        assert_eq!(state.fee_growth_global_a, Some(10));
        assert_eq!(state.fee_growth_global_b, Some(20));
    }

    #[test]
    fn test_alternate_field_names() {
        let fields = json!({
            "sqrt_price": "36893488147419103232",
            "tick_current_index": 42
        });

        let state = decode_pool_fields(&fields).unwrap();
        assert_eq!(state.sqrt_price_x64, 2u128 << 64);
        assert_eq!(state.tick_index, Some(42));
        assert_eq!(state.liquidity, None);
    }

    #[test]
    fn test_missing_sqrt_price_is_malformed() {
        let err = decode_pool_fields(&json!({ "liquidity": "1" })).unwrap_err();
        assert!(matches!(err, CollectError::MalformedState(_)));

        let err = decode_pool_fields(&json!({ "current_sqrt_price": "not-a-number" })).unwrap_err();
        assert!(matches!(err, CollectError::MalformedState(_)));

        let err = decode_pool_fields(&json!(["current_sqrt_price"])).unwrap_err();
        assert!(matches!(err, CollectError::MalformedState(_)));
    }
}
