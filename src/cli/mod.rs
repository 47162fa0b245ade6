//! Command line interface
//!
//! - `serve`: run the HTTP server (default)
//! - `migrate`: apply the PostgreSQL schema and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// API key gate for JSON-RPC dispatch
#[derive(Parser)]
#[command(name = "jsonrpc-keys")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Apply database migrations
    Migrate,
}

/// Load `.env`, configuration and logging shared by every command
pub fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;

    Ok(config)
}
