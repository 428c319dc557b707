// Collector health route

use crate::{
    collector::CollectorStatus,
    config::with_config,
    webserver::{state::AppState, utils::success_response},
};
use axum::{extract::State, response::Response, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct CollectorStatusResponse {
    enabled: bool,
    pools_configured: usize,
    /// Configured round period, absent when no global config was loaded
    interval_secs: Option<u64>,
    server_started_at: DateTime<Utc>,
    #[serde(flatten)]
    status: CollectorStatus,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/collector/status", get(get_collector_status))
}

/// GET /api/collector/status
async fn get_collector_status(State(state): State<Arc<AppState>>) -> Response {
    let (status, pools_configured) = match &state.collector {
        Some(collector) => (collector.status().await, collector.pools().len()),
        None => (CollectorStatus::default(), 0),
    };

    success_response(CollectorStatusResponse {
        enabled: state.collector.is_some(),
        pools_configured,
        interval_secs: with_config(|c| c.collector.interval_secs),
        server_started_at: state.startup_time,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{Collector, CollectorSettings};
    use crate::config::PoolConfig;
    use crate::query::QueryService;
    use crate::testing::{pool_fields, FakeReader, FakeStore};
    use crate::webserver::routes::test_support::{app_with, app_with_state, get_json};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_status_without_collector() {
        let (status, body) = get_json(app_with(vec![]), "/api/collector/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["enabled"], false);
        assert_eq!(body["rounds_completed"], 0);
    }

    #[tokio::test]
    async fn test_status_after_round() {
        let reader = Arc::new(FakeReader::new());
        reader.respond("0x1", Ok(pool_fields(1u128 << 64)));
        let store = Arc::new(FakeStore::new());

        let settings = CollectorSettings {
            pool_delay: std::time::Duration::ZERO,
            ..CollectorSettings::default()
        };
        let collector = Arc::new(Collector::new(
            vec![PoolConfig::new("0x1", "water", 9, 9), PoolConfig::new("0x2", "coal", 9, 9)],
            reader,
            store.clone(),
            settings,
        ));
        collector.run_once().await;

        let state = AppState::new(Arc::new(QueryService::new(store)), Some(collector));
        let (status, body) = get_json(app_with_state(state), "/api/collector/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["enabled"], true);
        assert_eq!(body["pools_configured"], 2);
        assert_eq!(body["rounds_completed"], 1);
        assert_eq!(body["last_outcomes"][0]["outcome"]["status"], "success");
        assert_eq!(body["last_outcomes"][1]["outcome"]["stage"], "fetch");
        assert_eq!(body["consecutive_failures"]["0x2"], 1);
    }
}
