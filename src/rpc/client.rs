// Sui JSON-RPC client for pool object reads

use super::PoolStateReader;
use crate::errors::RpcError;
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub struct SuiRpcClient {
    url: String,
    http: reqwest::Client,
    request_id: AtomicU64,
}

impl SuiRpcClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Transient(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.to_string(),
            http,
            request_id: AtomicU64::new(1),
        })
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        });

        if logger::is_debug_enabled(&LogTag::Rpc) {
            logger::debug(LogTag::Rpc, &format!("-> {} {}", self.url, payload));
        }

        let start = Instant::now();
        let response = self
            .http
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| RpcError::Transient(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RpcError::Transient(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            return Err(RpcError::Malformed(format!("HTTP {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RpcError::Transient(format!("Failed to read response body: {}", e)))?;

        logger::verbose(
            LogTag::Rpc,
            &format!("{} id={} answered in {}ms", method, id, start.elapsed().as_millis()),
        );

        Ok(body)
    }
}

#[async_trait]
impl PoolStateReader for SuiRpcClient {
    async fn get_object_state(&self, address: &str) -> Result<Value, RpcError> {
        let body = self
            .call(
                "sui_getObject",
                json!([address, { "showContent": true, "showType": true }]),
            )
            .await?;

        parse_get_object_response(&body)
    }
}

/// Extract `result.data.content.fields` from a `sui_getObject` response
pub fn parse_get_object_response(body: &Value) -> Result<Value, RpcError> {
    if let Some(err) = body.get("error") {
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(RpcError::Transient(format!("JSON-RPC error: {}", message)));
    }

    let result = body
        .get("result")
        .ok_or_else(|| RpcError::Malformed("response has no result".to_string()))?;

    if let Some(err) = result.get("error") {
        let code = err.get("code").and_then(Value::as_str).unwrap_or("");
        return match code {
            "notExists" | "deleted" => Err(RpcError::NotFound(code.to_string())),
            other => Err(RpcError::Malformed(format!("object error: {}", other))),
        };
    }

    result
        .get("data")
        .and_then(|data| data.get("content"))
        .and_then(|content| content.get("fields"))
        .filter(|fields| fields.is_object())
        .cloned()
        .ok_or_else(|| RpcError::Malformed("missing data.content.fields".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "data": {
                    "objectId": "0xabc",
                    "content": {
                        "dataType": "moveObject",
                        "type": "0x1::pool::Pool",
                        "fields": { "current_sqrt_price": "18446744073709551616" }
                    }
                }
            }
        });

        let fields = parse_get_object_response(&body).unwrap();
        assert_eq!(fields["current_sqrt_price"], "18446744073709551616");
    }

    #[test]
    fn test_parse_object_errors() {
        let missing = json!({ "result": { "error": { "code": "notExists", "object_id": "0xabc" } } });
        assert_eq!(
            parse_get_object_response(&missing),
            Err(RpcError::NotFound("notExists".to_string()))
        );

        let deleted = json!({ "result": { "error": { "code": "deleted" } } });
        assert!(matches!(
            parse_get_object_response(&deleted),
            Err(RpcError::NotFound(_))
        ));
    }

    #[test]
    fn test_parse_rpc_error_is_transient() {
        let body = json!({ "error": { "code": -32000, "message": "server busy" } });
        let err = parse_get_object_response(&body).unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn test_parse_missing_content() {
        let body = json!({ "result": { "data": { "objectId": "0xabc" } } });
        assert!(matches!(
            parse_get_object_response(&body),
            Err(RpcError::Malformed(_))
        ));

        let no_result = json!({ "jsonrpc": "2.0", "id": 1 });
        assert!(matches!(
            parse_get_object_response(&no_result),
            Err(RpcError::Malformed(_))
        ));
    }
}
