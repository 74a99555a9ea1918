//! Breedbox CLI — the main entry point.
//!
//! Commands:
//! - `ingest`   — Fetch the breed catalog and reload the staging table
//! - `filters`  — Show the selectable filter options
//! - `overview` — Lifespan, size, and temperament insights
//! - `finder`   — Interactive breed-finder chat (or single-message mode)
//! - `status`   — Show configuration and warehouse status

use clap::{Parser, Subcommand};

mod commands;

use commands::FilterArgs;

#[derive(Parser)]
#[command(
    name = "breedbox",
    about = "Breedbox — dog-breed dataset explorer and finder",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the breed catalog, archive it, and reload the staging table
    Ingest,

    /// List the filter options the dataset currently offers
    Filters,

    /// Show dataset insights for the current filters
    Overview {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Chat with the breed finder
    Finder {
        #[command(flatten)]
        filters: FilterArgs,

        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show configuration and warehouse status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Ingest => commands::ingest::run().await?,
        Commands::Filters => commands::filters::run().await?,
        Commands::Overview { filters } => commands::overview::run(filters).await?,
        Commands::Finder { filters, message } => commands::finder::run(filters, message).await?,
        Commands::Status => commands::status::run().await?,
    }

    Ok(())
}
