//! Reserve Eat server binary.
//!
//! Reads configuration from a TOML file
//! (`~/.config/reserve-eat/config.toml`, overridable via
//! `RESERVE_EAT_CONFIG`), bootstraps the ledger from the durable store and
//! serves the REST API until SIGTERM/SIGINT.

use std::sync::Arc;

use tracing::{error, info};

use reserve_eat::config::{default_config_path, AppConfig};
use reserve_eat::create_api_router;
use reserve_eat::infrastructure::storage::{FileAuditSink, FileIdSequence, JsonlReservationStore};
use reserve_eat::support::ShutdownCoordinator;
use reserve_eat::ReservationService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("RESERVE_EAT_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Reserve Eat reservation service...");

    // ── Persistence adapters ───────────────────────────────────
    tokio::fs::create_dir_all(&config.storage.data_dir).await?;
    let store = Arc::new(JsonlReservationStore::new(config.storage.reservations_file()));
    let ids = Arc::new(FileIdSequence::open(config.storage.counter_file()).await?);
    let audit = Arc::new(FileAuditSink::new(config.storage.audit_file()));

    // ── Ledger bootstrap ───────────────────────────────────────
    let service = match ReservationService::bootstrap(
        store,
        ids,
        audit,
        config.reservations.capacity_policy(),
        config.reservations.service_duration(),
    )
    .await
    {
        Ok(service) => Arc::new(service),
        Err(e) => {
            error!("Failed to load the reservation store: {}", e);
            return Err(e.into());
        }
    };
    info!(
        pool_size = config.reservations.pool_size,
        service_duration_minutes = config.reservations.service_duration_minutes,
        "Capacity policy configured"
    );

    // ── Shutdown coordination ──────────────────────────────────
    let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
    shutdown.start_signal_listener();

    // ── REST API server ────────────────────────────────────────
    let router = create_api_router(service.clone());
    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);

    let api_shutdown = shutdown.signal();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        api_shutdown.wait().await;
        info!("REST API server received shutdown signal");
    });

    let server_task = tokio::spawn(async move { server.await });

    // Final flush once the signal arrives; per-mutation flushes make this
    // a formality, but it closes the durability window.
    let flush_service = service.clone();
    shutdown
        .shutdown_with_cleanup(|| async move {
            if let Err(e) = flush_service.flush_all().await {
                error!("Final ledger flush failed: {}", e);
            }
        })
        .await;

    match server_task.await {
        Ok(Ok(())) => info!("Server stopped cleanly"),
        Ok(Err(e)) => error!("Server error: {}", e),
        Err(e) => error!("Server task panicked: {}", e),
    }

    Ok(())
}
