//! Kinship Workflow
//!
//! Turns proposals into confirmed relationships.
//!
//! The workflow provides:
//! - Relationship requests with a single accept/reject decision
//! - Suggestion generation, persistence and review
//! - Atomic acceptance: a relationship is written as a full edge pair or not at all
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use kinship_domain::PersonId;
//! use kinship_store::SqliteStore;
//! use kinship_workflow::SuggestionStore;
//!
//! let store = Arc::new(SqliteStore::new(":memory:").unwrap());
//! let suggestions = SuggestionStore::new(store);
//!
//! // Regenerate after a relationship change
//! let pending = suggestions.generate_for(PersonId::new(3)).unwrap();
//! ```

#![warn(missing_docs)]

mod config;
mod requests;
mod suggestions;

pub use config::SuggestionPolicy;
pub use requests::RequestWorkflow;
pub use suggestions::SuggestionStore;
