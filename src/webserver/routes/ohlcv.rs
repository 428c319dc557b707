// OHLCV API routes

use crate::{
    logger::{self, LogTag},
    ohlcvs::Candle,
    webserver::{
        state::AppState,
        utils::{error_response, success_response},
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

#[derive(Debug, Serialize)]
struct CandlesResponse {
    token: String,
    interval: String,
    candles: Vec<Candle>,
}

#[derive(Debug, Deserialize)]
pub struct CandlesQuery {
    interval: Option<String>,
    /// Kept as text so a bad value falls back to the default instead of a 400
    limit: Option<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/ohlcv/:token", get(get_candles_handler))
}

/// Parse and clamp the `limit` query parameter into `[1, MAX_LIMIT]`
fn resolve_limit(raw: Option<&str>) -> usize {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(n) if n < 1 => 1,
        Some(n) => usize::try_from(n).map_or(MAX_LIMIT, |n| n.min(MAX_LIMIT)),
        None => DEFAULT_LIMIT,
    }
}

/// GET /api/ohlcv/:token
async fn get_candles_handler(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Query(params): Query<CandlesQuery>,
) -> Result<Response, Response> {
    let interval = params.interval.as_deref().unwrap_or("1h");
    let limit = resolve_limit(params.limit.as_deref());

    match state.query.get_candles(&token, interval, limit) {
        Ok(series) => Ok(success_response(CandlesResponse {
            interval: interval.to_string(),
            candles: series.candles,
            token,
        })),
        Err(e) => {
            logger::error(
                LogTag::Webserver,
                &format!("Failed to build candles for {}: {}", token, e),
            );
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "ohlcv_fetch_failed",
                &e.to_string(),
                None,
            ))
        }
    }
}
