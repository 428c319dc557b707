/// Shared application state passed to all route handlers
use crate::collector::Collector;
use crate::query::QueryService;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub query: Arc<QueryService>,
    /// Absent when the process serves the API without collecting
    pub collector: Option<Arc<Collector>>,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(query: Arc<QueryService>, collector: Option<Arc<Collector>>) -> Self {
        Self {
            query,
            collector,
            startup_time: Utc::now(),
        }
    }
}
