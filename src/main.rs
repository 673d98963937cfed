mod api;
mod assistant;
mod cli;
mod community;
mod config;
mod db;
mod learning;
mod server;
mod waitlist;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aomigo", version, about = "AOMIGO learning companion backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the API server
    Serve,
    /// Run database diagnostics and print a health report
    Doctor,
    /// Show learning statistics
    Stats {
        /// Restrict counts to one user
        #[arg(long)]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::AomigoConfig::load()?;

    // Initialize tracing with the configured log level, to stderr.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => {
            server::serve(config).await?;
        }
        Command::Doctor => {
            cli::doctor::doctor(&config)?;
        }
        Command::Stats { user } => {
            cli::stats::stats(&config, user.as_deref())?;
        }
    }

    Ok(())
}
