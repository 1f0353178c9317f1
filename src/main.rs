mod api;
mod catalog;
mod cli;
mod config;
mod db;
mod embedding;
mod imaging;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "viewfinder",
    version,
    about = "Semantic photo search over a local SQLite catalog"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve,
    /// Bulk-import a directory of images
    Import {
        /// Directory to scan for images (recursive)
        dir: PathBuf,
        /// Category assigned to every imported photo
        #[arg(long, default_value = "other")]
        category: String,
        /// Author name recorded on every imported photo
        #[arg(long, default_value = "Unknown")]
        author: String,
    },
    /// Print library statistics
    Stats,
    /// Run database diagnostics
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::ViewfinderConfig::load()?;

    // Initialize tracing with the configured log level; RUST_LOG wins when set.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Serve => {
            server::serve(config).await?;
        }
        Command::Import {
            dir,
            category,
            author,
        } => {
            cli::import::import(&config, &dir, &category, &author).await?;
        }
        Command::Stats => {
            cli::stats::stats(&config)?;
        }
        Command::Doctor => {
            cli::doctor::doctor(&config)?;
        }
    }

    Ok(())
}
