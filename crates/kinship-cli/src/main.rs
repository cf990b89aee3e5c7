//! Kinship CLI - Command-line interface for the family relationship graph.

use anyhow::Context;
use clap::Parser;
use kinship_cli::commands::{self, Services};
use kinship_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    if let Command::Types = cli.command {
        commands::execute_types(&formatter)?;
        return Ok(());
    }

    let db = config.resolve_database(cli.db.as_deref())?;
    let services = Services::open(&db, config.regen.clone())
        .with_context(|| format!("opening database {}", db.display()))?;

    match cli.command {
        Command::Person(args) => commands::execute_person(args, &services, &formatter)?,
        Command::Relate(args) => commands::execute_relate(args, &services, &formatter)?,
        Command::Revoke(args) => commands::execute_revoke(args, &services, &formatter)?,
        Command::Relationships(args) => {
            commands::execute_relationships(args, &services, &formatter)?
        }
        Command::Suggest(args) => commands::execute_suggest(args, &services, &formatter)?,
        Command::Suggestions(args) => commands::execute_suggestions(args, &services, &formatter)?,
        Command::AcceptSuggestion(args) => {
            commands::execute_accept_suggestion(args, &services, &formatter)?
        }
        Command::Dismiss(args) => commands::execute_dismiss(args, &services, &formatter)?,
        Command::Request(args) => commands::execute_request(args, &services, &formatter)?,
        Command::RegenerateAll(args) => {
            commands::execute_regenerate_all(args, &services, &formatter).await?
        }
        Command::Types => commands::execute_types(&formatter)?,
    }

    Ok(())
}
