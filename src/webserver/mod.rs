//! HTTP surface over the query service and collector health

mod server;

pub mod routes;
pub mod state;
pub mod utils;

pub use server::{build_app, start_server};
pub use state::AppState;
