use anyhow::{Context, Result};
use poolcandles::{
    arguments::{get_config_path, is_api_only_enabled, is_collect_once_enabled, is_help_requested, print_help},
    collector::{Collector, CollectorSettings},
    config::{load_config_from_path, CONFIG_FILE_PATH},
    logger::{self, LogTag},
    rpc::{PoolStateReader, SuiRpcClient},
    store::{SampleStore, SqliteSampleStore},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Main entry point for poolcandles
///
/// Loads the config, opens the sample store, runs the collector loop in the
/// background and serves the HTTP API until Ctrl+C.
#[tokio::main]
async fn main() {
    logger::init();

    if is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    logger::info(
        LogTag::System,
        &format!("poolcandles v{} starting up", env!("CARGO_PKG_VERSION")),
    );

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            logger::error(LogTag::System, &format!("Fatal: {:#}", e));
            1
        }
    };

    logger::flush();
    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let config_path = get_config_path().unwrap_or_else(|| CONFIG_FILE_PATH.to_string());
    let config = load_config_from_path(&config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path))?;

    let store: Arc<dyn SampleStore> = Arc::new(
        SqliteSampleStore::open(&config.database.path)
            .with_context(|| format!("failed to open database {}", config.database.path))?,
    );
    let reader: Arc<dyn PoolStateReader> = Arc::new(SuiRpcClient::new(
        &config.rpc.url,
        Duration::from_secs(config.rpc.timeout_secs),
    )?);

    let collector = Arc::new(Collector::new(
        config.pools.clone(),
        reader,
        Arc::clone(&store),
        CollectorSettings::from_config(&config),
    ));

    if is_collect_once_enabled() {
        let report = collector.run_once().await;
        println!("{}", serde_json::to_string_pretty(&report)?);
        logger::info(LogTag::Collector, &format!("Single round: {}", report.summary()));
        return Ok(());
    }

    // One Notify per consumer so a signal arriving mid-round is not lost
    let collector_shutdown = Arc::new(Notify::new());
    let server_shutdown = Arc::new(Notify::new());
    {
        let collector_shutdown = Arc::clone(&collector_shutdown);
        let server_shutdown = Arc::clone(&server_shutdown);
        ctrlc::set_handler(move || {
            println!("\nReceived Ctrl+C, shutting down...");
            collector_shutdown.notify_one();
            server_shutdown.notify_one();
        })
        .context("failed to install Ctrl+C handler")?;
    }

    let collector_enabled = config.collector.enabled && !is_api_only_enabled();
    let collector_task = if collector_enabled {
        Some(tokio::spawn(
            Arc::clone(&collector).run(Arc::clone(&collector_shutdown)),
        ))
    } else {
        logger::info(LogTag::Collector, "Collector disabled, serving stored data only");
        None
    };

    serve(&config, store, collector_enabled.then(|| collector), server_shutdown).await?;

    if let Some(task) = collector_task {
        task.await.context("collector task panicked")?;
    }

    logger::info(LogTag::System, "Shutdown complete");
    Ok(())
}

#[cfg(feature = "web")]
async fn serve(
    config: &poolcandles::config::Config,
    store: Arc<dyn SampleStore>,
    collector: Option<Arc<Collector>>,
    shutdown: Arc<Notify>,
) -> Result<()> {
    use poolcandles::query::QueryService;
    use poolcandles::webserver::{start_server, AppState};

    if !config.webserver.enabled {
        shutdown.notified().await;
        return Ok(());
    }

    let state = AppState::new(Arc::new(QueryService::new(store)), collector);
    start_server(&config.webserver, state, shutdown)
        .await
        .map_err(anyhow::Error::msg)
}

#[cfg(not(feature = "web"))]
async fn serve(
    _config: &poolcandles::config::Config,
    _store: Arc<dyn SampleStore>,
    _collector: Option<Arc<Collector>>,
    shutdown: Arc<Notify>,
) -> Result<()> {
    shutdown.notified().await;
    Ok(())
}
