//! Kinship Deduction Engine
//!
//! Deduces new relationships by composing two accepted edges through one
//! intermediate person (the connector).
//!
//! The engine provides:
//! - A finite composition table keyed by relationship families
//! - Gendered result codes with a documented neutral fallback
//! - Deterministic confidence scores and human-readable reasons
//! - At most one candidate per person, ordered for stable output
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use kinship_deduction::DeductionEngine;
//! use kinship_domain::PersonId;
//! use kinship_store::SqliteStore;
//!
//! let store = Arc::new(SqliteStore::new(":memory:").unwrap());
//! let engine = DeductionEngine::new(store);
//! let candidates = engine.generate_suggestions(PersonId::new(3)).unwrap();
//! ```

#![warn(missing_docs)]

mod confidence;
mod engine;
pub mod rules;

pub use confidence::ConfidencePolicy;
pub use engine::DeductionEngine;
pub use rules::{CompositionRule, Outcome, Tier};
