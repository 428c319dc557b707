// Current price route

use crate::{
    errors::QueryError,
    logger::{self, LogTag},
    webserver::{
        state::AppState,
        utils::{error_response, success_response},
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/price/:token", get(get_price_handler))
}

/// GET /api/price/:token
async fn get_price_handler(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Response, Response> {
    match state.query.get_current_price(&token) {
        Ok(mut current) => {
            current.token = token;
            Ok(success_response(current))
        }
        Err(QueryError::NoData(_)) => Err(error_response(
            StatusCode::NOT_FOUND,
            "no_data",
            "No data found for token",
            None,
        )),
        Err(e) => {
            logger::error(
                LogTag::Webserver,
                &format!("Failed to read price for {}: {}", token, e),
            );
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "price_fetch_failed",
                &e.to_string(),
                None,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::store::PriceSample;
    use crate::webserver::routes::test_support::{app_with, get_json};
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_price_with_change() {
        let now = Utc::now();
        let samples = vec![
            PriceSample::new("0x1", "WATER", 100.0, now - Duration::hours(30)),
            PriceSample::new("0x1", "WATER", 110.0, now - Duration::minutes(1)),
        ];

        let (status, body) = get_json(app_with(samples), "/api/price/water").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["token"], "water");
        assert_eq!(body["price"], 110.0);
        let change = body["priceChange24hPercent"].as_f64().unwrap();
        assert!((change - 10.0).abs() < 1e-9);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_price_not_found() {
        let (status, body) = get_json(app_with(vec![]), "/api/price/unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "No data found for token");
    }
}
