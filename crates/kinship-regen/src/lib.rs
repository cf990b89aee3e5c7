//! Kinship Regen
//!
//! Batch regeneration of relationship suggestions.
//!
//! # Overview
//!
//! Regeneration walks every person in the store and rebuilds their pending
//! suggestions from the current accepted graph:
//! - **Bounded concurrency**: at most `max_concurrent` subjects at once
//! - **Failure isolation**: one failing subject is logged and counted, the pass continues
//! - **Cancellation**: a cancelled pass stops starting subjects; each subject is all or nothing
//! - **Metrics**: processed, failed and skipped counts per pass and in total
//!
//! # Usage
//!
//! ## One-time Pass
//!
//! ```no_run
//! use kinship_regen::{RegenConfig, Regenerator};
//! use kinship_store::SqliteStore;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SqliteStore::new("kinship.db")?);
//!     let mut regenerator = Regenerator::new(store, RegenConfig::default());
//!
//!     let pass = regenerator.regenerate_all(&CancellationToken::new()).await?;
//!     println!("{}", pass.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Background Worker
//!
//! See [`RegenWorker`].
//!
//! # Configuration
//!
//! ```toml
//! [regen]
//! max_concurrent = 4
//! interval_secs = 3600
//! dismissal_cooldown_days = 90
//! dry_run = false
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod metrics;
mod regenerator;
mod worker;

pub use config::RegenConfig;
pub use error::RegenError;
pub use metrics::RegenMetrics;
pub use regenerator::Regenerator;
pub use worker::RegenWorker;
