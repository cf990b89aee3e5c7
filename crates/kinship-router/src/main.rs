//! Kinship Router binary
//!
//! Starts the HTTP server for relationship requests and suggestions.

use kinship_router::{config::RouterConfig, start_server, RouterError};
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), RouterError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        RouterConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using an in-memory database");
        eprintln!("Usage: kinship-router --config <path-to-config.toml>");
        eprintln!();
        RouterConfig::default_test_config()
    };

    start_server(config).await
}

fn print_help() {
    println!("Kinship Router - Relationship requests and suggestions over HTTP");
    println!();
    println!("USAGE:");
    println!("    kinship-router --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address: IP address to bind (e.g., '127.0.0.1')");
    println!("    - bind_port: Port number (e.g., 8080)");
    println!("    - database_path: SQLite database file");
    println!("    - regen_enabled: Run periodic regeneration (default: false)");
    println!("    - [regen]: max_concurrent, interval_secs, dismissal_cooldown_days, dry_run");
    println!();
    println!("    Log filtering follows RUST_LOG (default: info).");
}
