//! Courier — Notification Dispatch Service
//!
//! Main entry point that wires the store, channel adapters, dispatch
//! engine, and scheduler together and runs until shutdown.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use courier_channels::{
    ChannelSet, ConnectionRegistry, EmailAdapter, PushAdapter, RealtimeAdapter, SmsAdapter,
};
use courier_core::config::AppConfig;
use courier_core::error::AppError;
use courier_dispatch::{DispatchQueue, DispatchScheduler, Dispatcher, LifecycleTracker};
use courier_service::{QueryService, SubmitService};
use courier_store::{
    connection::StorePool, MemoryNotificationStore, NotificationStore, PgNotificationStore,
};

#[tokio::main]
async fn main() {
    let env = std::env::var("COURIER_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Courier v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Store ────────────────────────────────────────────
    let (store, pool): (Arc<dyn NotificationStore>, Option<StorePool>) =
        match config.store.provider.as_str() {
            "postgres" => {
                tracing::info!("Connecting to PostgreSQL store...");
                let pool = StorePool::connect(&config.store).await?;
                courier_store::migration::run_migrations(pool.pool()).await?;
                (
                    Arc::new(PgNotificationStore::new(pool.pool().clone())),
                    Some(pool),
                )
            }
            _ => {
                tracing::info!("Using in-memory store");
                (Arc::new(MemoryNotificationStore::new()), None)
            }
        };

    // ── Step 2: Realtime registry + channel adapters ─────────────
    let registry = Arc::new(ConnectionRegistry::new(config.realtime.clone()));

    let email = EmailAdapter::new(config.email.as_ref())
        .map_err(|e| AppError::configuration(format!("Email adapter init failed: {e}")))?;

    let channels = ChannelSet::new()
        .with(Arc::new(email))
        .with(Arc::new(SmsAdapter::new(config.sms.clone())))
        .with(Arc::new(RealtimeAdapter::new(Arc::clone(&registry))))
        .with(Arc::new(PushAdapter::new()));

    tracing::info!(channels = channels.len(), "Channel adapters installed");

    // ── Step 3: Dispatch engine ──────────────────────────────────
    let queue = Arc::new(DispatchQueue::new());
    let lifecycle = LifecycleTracker::new(Arc::clone(&store));
    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&queue), channels, lifecycle));

    // ── Step 4: Services ─────────────────────────────────────────
    // Submission and queries happen through these handles; the embedding
    // application drives them.
    let _submit_service = Arc::new(SubmitService::new(
        Arc::clone(&store),
        Arc::clone(&queue),
        config.dispatch.clone(),
    ));
    let query_service = Arc::new(QueryService::new(Arc::clone(&store)));

    let stats = query_service.statistics(None).await?;
    tracing::info!(
        total = stats.total,
        pending = stats.pending,
        "Notification store ready"
    );

    // ── Step 5: Scheduler ────────────────────────────────────────
    let mut scheduler = DispatchScheduler::new(
        config.dispatch.clone(),
        Arc::clone(&dispatcher),
        Arc::clone(&store),
    )
    .await?;
    scheduler.register_tasks().await?;
    scheduler.start().await?;

    tracing::info!("Courier dispatch service running");

    // ── Step 6: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown...");

    scheduler.shutdown().await?;

    // One final drain so nothing queued before the signal is dropped.
    let processed = dispatcher.drain().await;
    if processed > 0 {
        tracing::info!(processed, "Final drain completed");
    }

    if let Some(pool) = pool {
        pool.close().await;
    }

    tracing::info!("Courier shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
