//! Error taxonomy shared by every layer of the engine

use crate::PersonId;
use thiserror::Error;

/// Errors surfaced by the catalog, the stores and the workflows
///
/// Workflows propagate these undecorated; translating them into user-facing
/// messages is the presentation layer's job.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KinshipError {
    /// Unknown relationship-type code (caller input error)
    #[error("Unknown relationship type: {0}")]
    InvalidType(String),

    /// Structurally invalid input, such as a request addressed to oneself
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Write contradicts an existing accepted edge of a different type
    #[error("Relationship conflict: {from} -> {to} is already '{existing}', refusing '{attempted}'")]
    Conflict {
        /// Source of the contradicted edge
        from: PersonId,
        /// Target of the contradicted edge
        to: PersonId,
        /// Code already stored
        existing: String,
        /// Code that was refused
        attempted: String,
    },

    /// A pending request or suggestion already exists for the pair
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// State transition attempted on a terminal request or suggestion
    #[error("Already resolved: {0}")]
    AlreadyResolved(String),

    /// Referenced person, edge, request or suggestion does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Infrastructure failure in the persistence backend
    #[error("Storage error: {0}")]
    Storage(String),
}

impl KinshipError {
    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            KinshipError::InvalidType(_) => "invalid_type",
            KinshipError::InvalidInput(_) => "invalid_input",
            KinshipError::Conflict { .. } => "conflict",
            KinshipError::Duplicate(_) => "duplicate",
            KinshipError::AlreadyResolved(_) => "already_resolved",
            KinshipError::NotFound(_) => "not_found",
            KinshipError::Storage(_) => "storage",
        }
    }
}

/// Convenient Result type using KinshipError
pub type Result<T> = std::result::Result<T, KinshipError>;
