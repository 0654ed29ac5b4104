//! moodtunes server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context};
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moodtunes::api::create_router;
use moodtunes::collaborators::{OpenRouterExtractor, SpotifyLookup};
use moodtunes::tasks::METRICS_LOG_INTERVAL;
use moodtunes::{
    spawn_maintenance_task, spawn_metrics_task, AppState, Config, Orchestrator, ServiceState,
};

/// Main entry point for the recommendation server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Build provider adapters and the orchestrator
/// 4. Start background maintenance and metrics tasks
/// 5. Serve HTTP until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodtunes=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting moodtunes");

    let config = Config::from_env();
    let invalid = config.validate();
    if !invalid.is_empty() {
        bail!("Missing or invalid configuration: {}", invalid.join(", "));
    }
    info!(
        "Configuration loaded: cache_max_size={}, rate_limit={}/{}s, port={}",
        config.cache_max_size,
        config.max_requests_per_minute,
        config.rate_limit_window,
        config.server_port
    );

    let state = ServiceState::new(
        config.rate_limit(),
        &config.lookup_cache(),
        &config.extraction_cache(),
    );
    let orchestrator = Orchestrator::new(
        Arc::new(OpenRouterExtractor::new(config.openrouter())),
        Arc::new(SpotifyLookup::new(config.spotify())),
        state.clone(),
        config.orchestrator(),
    );

    let tasks = vec![
        spawn_maintenance_task(state.clone(), config.cleanup_interval()),
        spawn_metrics_task(state, METRICS_LOG_INTERVAL),
    ];
    info!("Background tasks started");

    let app = create_router(AppState::new(orchestrator));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(tasks))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts the
/// background tasks.
async fn shutdown_signal(tasks: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for task in tasks {
        task.abort();
    }
    warn!("Background tasks aborted");
}
