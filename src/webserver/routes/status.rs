use axum::{response::Json, routing::get, Router};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    logger::{self, LogTag},
    webserver::state::AppState,
};

/// Liveness response, independent of collector or store state
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub service: String,
    pub version: String,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

/// GET /health
async fn health_check() -> Json<HealthResponse> {
    logger::verbose(LogTag::Webserver, "Health check endpoint called");

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
