//! Kinship Router
//!
//! JSON-over-HTTP surface for relationship requests and suggestions, with an
//! optional background regeneration worker.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;

use config::RouterConfig;
use handlers::{create_router, AppState};
use kinship_regen::{RegenWorker, Regenerator};
use kinship_store::{SqliteStore, StoreError};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Router error
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Database could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the HTTP server
///
/// Opens the store, optionally starts the regeneration worker, and serves
/// until Ctrl+C. The worker is cancelled when the server stops.
pub async fn start_server(config: RouterConfig) -> Result<(), RouterError> {
    info!("Starting Kinship Router");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path.display());

    let store = Arc::new(SqliteStore::new(&config.database_path)?);
    let state = AppState::new(Arc::clone(&store), config.regen.policy());

    let cancel = CancellationToken::new();
    let worker = if config.regen_enabled {
        let regenerator = Regenerator::with_suggestions(
            Arc::clone(&store),
            Arc::clone(&state.suggestions),
            config.regen.clone(),
        );
        let mut worker = RegenWorker::from_regenerator(regenerator);
        let token = worker.cancel_token();
        let shutdown = cancel.clone();
        info!("Regeneration worker enabled (interval: {:?})", config.regen.interval());
        Some(tokio::spawn(async move {
            tokio::select! {
                result = worker.run() => result,
                _ = shutdown.cancelled() => {
                    token.cancel();
                    Ok(())
                }
            }
        }))
    } else {
        None
    };

    let app = create_router(state);
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Router listening on {}", config.bind_addr());

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .map_err(|e| RouterError::Server(e.to_string()));

    cancel.cancel();
    if let Some(handle) = worker {
        match handle.await {
            Ok(Err(e)) => tracing::error!("Regeneration worker failed: {}", e),
            Err(e) => tracing::error!("Regeneration worker task failed: {}", e),
            Ok(Ok(())) => {}
        }
    }

    served
}
