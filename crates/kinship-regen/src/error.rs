//! Error types for regeneration runs

use kinship_domain::KinshipError;
use thiserror::Error;

/// Errors that can occur during a regeneration pass
#[derive(Error, Debug)]
pub enum RegenError {
    /// Storage layer error outside any single subject
    #[error("Storage error: {0}")]
    Store(#[from] KinshipError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}
