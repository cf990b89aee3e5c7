//! Kinship Domain Layer
//!
//! This crate contains the core domain model for the family-relationship
//! inference engine. It defines the fundamental concepts, value objects and
//! trait interfaces that every other crate depends upon, and performs no I/O.
//!
//! ## Key Concepts
//!
//! - **Person**: an externally owned record; the core only reads id and gender
//! - **Relationship type**: a catalog code such as `father`, grouped into
//!   semantic [`Family`] values with gendered variants and inverses
//! - **Edge**: a directed typed relationship. `(A -> B, code)` reads
//!   "A is B's `code`", and accepted edges always exist as mutual-inverse pairs
//! - **Request**: a proposed relationship awaiting a single accept/reject
//! - **Suggestion**: a system-deduced, non-binding relationship for review
//!
//! ## Architecture
//!
//! - Pure domain logic and value types only
//! - Storage implementations live in `kinship-store`
//! - Trait definitions for every external interaction live in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod edge;
pub mod error;
pub mod ids;
pub mod person;
pub mod request;
pub mod suggestion;
pub mod traits;

// Re-exports for convenience
pub use catalog::{Category, DefinitionGender, Family, GenderedCode, RelationshipTypeCatalog, RelationshipTypeDefinition};
pub use edge::{EdgePair, EdgeStatus, RelationshipEdge};
pub use error::{KinshipError, Result};
pub use ids::{RequestId, SuggestionId};
pub use person::{Gender, Person, PersonId};
pub use request::{RelationshipRequest, RequestStatus};
pub use suggestion::{Candidate, Suggestion, SuggestionStatus};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current timestamp in seconds since Unix epoch
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
