//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// GastoTrack - Track and analyze personal expenses
#[derive(Parser)]
#[command(name = "gastotrack")]
#[command(about = "Self-hosted personal expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "gastotrack.db", env = "GASTOTRACK_DB", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000", env = "GASTOTRACK_PORT")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1", env = "GASTOTRACK_HOST")]
        host: String,

        /// Directory containing static front-end files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origin (repeatable). Can also be set via
        /// GASTOTRACK_CORS_ORIGINS as a comma-separated list.
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,
    },

    /// Show database status (size, record counts)
    Status,
}
