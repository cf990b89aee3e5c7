//! Background worker for periodic regeneration

use crate::{RegenConfig, RegenError, RegenMetrics, Regenerator};
use kinship_domain::traits::KinshipStore;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tokio_util::sync::CancellationToken;

/// Background worker that regenerates all suggestions on a schedule
///
/// Stops on Ctrl+C or when its cancellation token fires. A pass in flight
/// when the token fires stops launching subjects and returns.
///
/// # Examples
///
/// ```no_run
/// use kinship_regen::{RegenConfig, RegenWorker};
/// use kinship_store::SqliteStore;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = Arc::new(SqliteStore::new("kinship.db")?);
///     let mut worker = RegenWorker::new(store, RegenConfig::default());
///
///     // Run indefinitely (until Ctrl+C)
///     worker.run().await?;
///     Ok(())
/// }
/// ```
pub struct RegenWorker<S> {
    regenerator: Regenerator<S>,
    interval: Duration,
    cancel: CancellationToken,
}

impl<S: KinshipStore + 'static> RegenWorker<S> {
    /// Create a new background worker with the given configuration
    pub fn new(store: Arc<S>, config: RegenConfig) -> Self {
        Self::from_regenerator(Regenerator::new(store, config))
    }

    /// Wrap an existing regenerator
    pub fn from_regenerator(regenerator: Regenerator<S>) -> Self {
        Self {
            interval: regenerator.config().interval(),
            regenerator,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the worker when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the worker until Ctrl+C or cancellation
    ///
    /// A failed pass is logged and the worker waits for the next tick.
    pub async fn run(&mut self) -> Result<(), RegenError> {
        let cancel = self.cancel.clone();
        let mut ticker = interval(self.interval);

        tracing::info!("Regeneration worker started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Cancellation requested, stopping regeneration worker");
                    break;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, stopping regeneration worker");
                    cancel.cancel();
                    break;
                }
                _ = ticker.tick() => {
                    tracing::debug!("Starting regeneration pass");
                    if let Err(e) = self.regenerator.regenerate_all(&cancel).await {
                        tracing::error!("Regeneration pass failed: {}", e);
                    }
                }
            }
        }

        tracing::info!(
            "Regeneration worker stopped. Final metrics:\n{}",
            self.regenerator.metrics().summary()
        );
        Ok(())
    }

    /// Run for a specific number of passes, stopping at the first failed pass
    pub async fn run_cycles(&mut self, cycles: usize) -> Result<(), RegenError> {
        let cancel = self.cancel.clone();
        let mut ticker = interval(self.interval);

        for cycle in 0..cycles {
            if cancel.is_cancelled() {
                break;
            }
            ticker.tick().await;

            let pass = self.regenerator.regenerate_all(&cancel).await.map_err(|e| {
                tracing::error!("Pass {}/{} failed: {}", cycle + 1, cycles, e);
                e
            })?;
            tracing::info!(
                "Pass {}/{} completed: {} processed, {} failed, {} skipped",
                cycle + 1,
                cycles,
                pass.processed,
                pass.failed,
                pass.skipped
            );
        }

        tracing::info!(
            "Regeneration worker finished {} cycles. Final metrics:\n{}",
            cycles,
            self.regenerator.metrics().summary()
        );
        Ok(())
    }

    /// Get the accumulated metrics
    pub fn metrics(&self) -> &RegenMetrics {
        self.regenerator.metrics()
    }

    /// Reset the metrics counters
    pub fn reset_metrics(&mut self) {
        self.regenerator.reset_metrics();
    }
}
