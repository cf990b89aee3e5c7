//! Kinship CLI library.
//!
//! Command-line access to a local kinship database: people, relationships,
//! requests, suggestions and batch regeneration, with table, JSON or quiet output.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
