use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sagemcom_exporter::{
    AppState, Collector, Config, MetricsRegistry, Result, SagemcomClient, create_router,
    start_collection_loop,
};

/// Grace period for an in-flight collection cycle on shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(20);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    setup_tracing();

    // Configuration errors are fatal: exit non-zero with a diagnostic
    let config = Config::from_env().inspect_err(|e| {
        tracing::error!("{}", e);
    })?;

    tracing::info!(
        "Polling router at {} every {}s",
        config.router_host,
        config.collection_interval_secs
    );

    let registry = MetricsRegistry::new();
    let client = Arc::new(SagemcomClient::new(&config));
    let collector = Arc::new(Collector::new(client, registry.clone(), &config));

    let state = Arc::new(AppState {
        config: config.clone(),
        metrics: registry,
    });

    // Shutdown channel (graceful shutdown)
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let scheduler = start_collection_loop(
        shutdown_rx.clone(),
        collector,
        Duration::from_secs(config.collection_interval_secs),
        SHUTDOWN_GRACE,
    );

    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse().map_err(|e| {
        tracing::error!("Invalid server address: {}", e);
        e
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind address {}: {}", addr, e);
        e
    })?;

    tracing::info!("Sagemcom exporter starting on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET /health  - Health check");
    tracing::info!("  - GET /metrics - Prometheus metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown({
            let mut shutdown_rx = shutdown_rx.clone();
            async move {
                let _ = shutdown_rx.changed().await;
                tracing::info!("HTTP server shutting down");
            }
        })
        .await
        .map_err(|e| {
            tracing::error!("Server error: {}", e);
            e
        })?;

    // Let the scheduler drain its in-flight cycle before exit
    let _ = scheduler.await;

    Ok(())
}

fn setup_tracing() {
    // Respect RUST_LOG, default to "info" when unset
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
