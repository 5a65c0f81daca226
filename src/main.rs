mod cli;
mod config;
mod error;
mod export;
mod models;
mod services;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "strikeout-center")]
#[command(about = "Consensus odds feed for MLB pitcher strikeout props")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export today's props feed as a single JSON file
    Export {
        /// Output filename (defaults to mlb_strikeout_props_<date>.json)
        #[arg(short, long)]
        output: Option<String>,
        /// Print the JSON to stdout instead of a file
        #[arg(long)]
        stdout: bool,
        /// Also print a summary to the console
        #[arg(long)]
        pretty: bool,
    },
    /// Regenerate the static public/ directory for web hosting
    Publish {
        #[arg(short, long, default_value = "public")]
        dir: String,
    },
    /// Print a console summary of today's primary-line consensus odds
    Summary,
    /// Debug listing of today's games and the Eastern day window
    Games,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Export { output, stdout, pretty }) => {
            tracing::info!("Exporting strikeout props feed");
            cli::export_feed(output, stdout, pretty).await?;
        }
        Some(Commands::Publish { dir }) => {
            tracing::info!("Publishing public feed to {}", dir);
            cli::publish_feed(&dir).await?;
        }
        Some(Commands::Summary) => {
            cli::print_summary().await?;
        }
        Some(Commands::Games) => {
            cli::debug_games().await?;
        }
        None => {
            // Default to the scheduled job's behavior
            tracing::info!("Publishing public feed to public");
            cli::publish_feed("public").await?;
        }
    }

    Ok(())
}
