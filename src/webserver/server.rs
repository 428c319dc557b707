/// Axum webserver lifecycle: bind, serve, graceful shutdown
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::cors::CorsLayer;

use crate::{
    config::WebserverConfig,
    logger::{self, LogTag},
    webserver::{routes, state::AppState},
};

/// Serve until `shutdown` is notified
pub async fn start_server(
    config: &WebserverConfig,
    state: AppState,
    shutdown: Arc<Notify>,
) -> Result<(), String> {
    let app = build_app(Arc::new(state));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| format!("Invalid bind address: {}", e))?;

    let listener = TcpListener::bind(&addr).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::AddrInUse => format!(
            "Failed to bind to {}: Address already in use (set PORT or webserver.port)",
            addr
        ),
        std::io::ErrorKind::PermissionDenied => format!(
            "Failed to bind to {}: Permission denied, use a port above 1024",
            addr
        ),
        _ => format!("Failed to bind to {}: {}", addr, e),
    })?;

    logger::info(
        LogTag::Webserver,
        &format!("Webserver listening on http://{}", addr),
    );
    logger::debug(
        LogTag::Webserver,
        "Endpoints: /health /api/ohlcv/:token /api/price/:token /api/collector/status",
    );

    let shutdown_signal = async move {
        shutdown.notified().await;
        logger::debug(
            LogTag::Webserver,
            "Received shutdown signal, stopping webserver...",
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    logger::info(LogTag::Webserver, "Webserver stopped");

    Ok(())
}

/// Router with middleware; the frontend is served from another origin
pub fn build_app(state: Arc<AppState>) -> Router {
    routes::create_router(state).layer(CorsLayer::permissive())
}
