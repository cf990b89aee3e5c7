//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Kinship CLI - Manage a family relationship graph and its suggestions.
#[derive(Debug, Parser)]
#[command(name = "kinship")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true, env = "KINSHIP_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage person records
    Person(PersonArgs),

    /// Record a confirmed relationship directly: A is B's CODE
    Relate(RelateArgs),

    /// Revoke the relationship between two people
    Revoke(PairArgs),

    /// List relationships of a person
    Relationships(RelationshipsArgs),

    /// Regenerate and show suggestions for a person
    Suggest(PersonRef),

    /// Show pending suggestions for a person
    Suggestions(PersonRef),

    /// Accept a suggestion
    AcceptSuggestion(IdArg),

    /// Dismiss a suggestion
    Dismiss(IdArg),

    /// Manage relationship requests
    Request(RequestArgs),

    /// Regenerate suggestions for everyone
    RegenerateAll(RegenerateArgs),

    /// List relationship types
    Types,
}

/// Arguments for person management.
#[derive(Debug, Parser)]
pub struct PersonArgs {
    #[command(subcommand)]
    pub action: PersonAction,
}

/// Person management actions.
#[derive(Debug, Subcommand)]
pub enum PersonAction {
    /// Add or update a person
    Add {
        /// Person ID
        id: u64,
        /// Display name
        name: String,
        /// Gender
        #[arg(short, long, value_enum, default_value = "unknown")]
        gender: GenderArg,
    },

    /// List all people
    List,
}

/// Arguments for the relate command.
#[derive(Debug, Parser)]
pub struct RelateArgs {
    /// Person the code describes
    pub a: u64,
    /// Person the relationship is relative to
    pub b: u64,
    /// Relationship type code (e.g. father, sister_in_law)
    pub code: String,
}

/// Two person IDs.
#[derive(Debug, Parser)]
pub struct PairArgs {
    /// First person
    pub a: u64,
    /// Second person
    pub b: u64,
}

/// Arguments for the relationships command.
#[derive(Debug, Parser)]
pub struct RelationshipsArgs {
    /// Person ID
    pub person: u64,

    /// Only edges with this status (pending, accepted, rejected)
    #[arg(short, long)]
    pub status: Option<String>,
}

/// A single person ID.
#[derive(Debug, Parser)]
pub struct PersonRef {
    /// Person ID
    pub person: u64,
}

/// A single suggestion or request ID.
#[derive(Debug, Parser)]
pub struct IdArg {
    /// Identifier (UUID)
    pub id: String,
}

/// Arguments for request management.
#[derive(Debug, Parser)]
pub struct RequestArgs {
    #[command(subcommand)]
    pub action: RequestAction,
}

/// Request management actions.
#[derive(Debug, Subcommand)]
pub enum RequestAction {
    /// Propose that TARGET is REQUESTER's CODE
    Create {
        /// Requesting person
        requester: u64,
        /// Person asked to confirm
        target: u64,
        /// Relationship type code
        code: String,
        /// Note for the target
        #[arg(short, long, default_value = "")]
        message: String,
    },

    /// Accept a pending request
    Accept {
        /// Request ID
        id: String,
    },

    /// Reject a pending request
    Reject {
        /// Request ID
        id: String,
    },

    /// List pending requests addressed to a person
    List {
        /// Person ID
        person: u64,
    },
}

/// Arguments for batch regeneration.
#[derive(Debug, Parser)]
pub struct RegenerateArgs {
    /// Subjects regenerated at the same time
    #[arg(short = 'j', long)]
    pub max_concurrent: Option<usize>,

    /// Compute suggestions without storing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Gender argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum GenderArg {
    /// Male
    Male,
    /// Female
    Female,
    /// Not recorded
    Unknown,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<GenderArg> for kinship_domain::Gender {
    fn from(gender: GenderArg) -> Self {
        match gender {
            GenderArg::Male => kinship_domain::Gender::Male,
            GenderArg::Female => kinship_domain::Gender::Female,
            GenderArg::Unknown => kinship_domain::Gender::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["kinship", "types"]);
        assert!(matches!(cli.command, Command::Types));
        assert!(cli.format.is_none());
        assert!(!cli.no_color);
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "kinship",
            "suggestions",
            "3",
            "--format",
            "json",
            "--db",
            "/tmp/family.db",
        ]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/family.db")));
        match cli.command {
            Command::Suggestions(args) => assert_eq!(args.person, 3),
            _ => panic!("Expected Suggestions command"),
        }
    }

    #[test]
    fn test_person_add() {
        let cli = Cli::parse_from(["kinship", "person", "add", "2", "Fatima", "-g", "female"]);
        match cli.command {
            Command::Person(PersonArgs {
                action: PersonAction::Add { id, name, gender },
            }) => {
                assert_eq!(id, 2);
                assert_eq!(name, "Fatima");
                assert!(matches!(gender, GenderArg::Female));
            }
            _ => panic!("Expected Person Add command"),
        }
    }

    #[test]
    fn test_request_create() {
        let cli = Cli::parse_from([
            "kinship", "request", "create", "3", "2", "mother", "-m", "Is this you?",
        ]);
        match cli.command {
            Command::Request(RequestArgs {
                action:
                    RequestAction::Create {
                        requester,
                        target,
                        code,
                        message,
                    },
            }) => {
                assert_eq!((requester, target), (3, 2));
                assert_eq!(code, "mother");
                assert_eq!(message, "Is this you?");
            }
            _ => panic!("Expected Request Create command"),
        }
    }

    #[test]
    fn test_regenerate_all() {
        let cli = Cli::parse_from(["kinship", "regenerate-all", "-j", "8", "--dry-run"]);
        match cli.command {
            Command::RegenerateAll(args) => {
                assert_eq!(args.max_concurrent, Some(8));
                assert!(args.dry_run);
            }
            _ => panic!("Expected RegenerateAll command"),
        }
    }

    #[test]
    fn test_gender_conversion() {
        let gender: kinship_domain::Gender = GenderArg::Female.into();
        assert_eq!(gender, kinship_domain::Gender::Female);
    }
}
