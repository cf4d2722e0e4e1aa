//! GastoTrack CLI - Personal expense tracker
//!
//! Usage:
//!   gastotrack init               Initialize database
//!   gastotrack serve --port 3000  Start web server
//!   gastotrack status             Show database status

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            static_dir,
            cors_origins,
        } => commands::cmd_serve(&cli.db, &host, port, static_dir.as_deref(), cors_origins).await,
        Commands::Status => commands::cmd_status(&cli.db),
    }
}
