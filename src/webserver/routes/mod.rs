use crate::webserver::state::AppState;
use axum::Router;
use std::sync::Arc;

pub mod collector;
pub mod ohlcv;
pub mod price;
pub mod status;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(status::routes())
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(ohlcv::routes())
        .merge(price::routes())
        .merge(collector::routes())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::query::QueryService;
    use crate::store::{PriceSample, SampleStore};
    use crate::testing::FakeStore;
    use crate::webserver::{build_app, state::AppState};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    pub fn app_with(samples: Vec<PriceSample>) -> Router {
        let store: Arc<dyn SampleStore> = Arc::new(FakeStore::with_samples(samples));
        let state = AppState::new(Arc::new(QueryService::new(store)), None);
        build_app(Arc::new(state))
    }

    pub fn app_with_state(state: AppState) -> Router {
        build_app(Arc::new(state))
    }

    pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
