use anyhow::Result;
use clap::{Parser, Subcommand};

mod enrich;
mod fetch;
mod reconcile;
mod regions;
mod store;
mod sync;
mod types;

pub use types::*;

pub const NPS_API_URL: &str = "https://developer.nps.gov/api/v1";

const DEFAULT_STORE: &str = "sites.json";

#[derive(Parser)]
#[command(name = "nps-sites")]
#[command(about = "NPS park and passport-stamp site collector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch parks and stamp locations from the NPS API and merge them
    /// into the site store (merged dataset is also printed to stdout)
    Sync {
        /// Path to the sites.json store
        #[arg(short, long, default_value = DEFAULT_STORE)]
        store: String,
        /// Quiet mode - suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Backfill descriptive fields using the OpenAI API
    Enrich {
        #[command(subcommand)]
        action: EnrichAction,
    },
}

#[derive(Subcommand)]
enum EnrichAction {
    /// Fill in nps_established (YYYY or "Unknown") where missing
    Established {
        /// Path to the sites.json store
        #[arg(short, long, default_value = DEFAULT_STORE)]
        store: String,
        /// Quiet mode - suppress progress output
        #[arg(short, long)]
        quiet: bool,
        /// Re-query sites that already have a value
        #[arg(short, long)]
        force: bool,
    },
    /// Fill in previous_names where missing
    PreviousNames {
        /// Path to the sites.json store
        #[arg(short, long, default_value = DEFAULT_STORE)]
        store: String,
        /// Quiet mode - suppress progress output
        #[arg(short, long)]
        quiet: bool,
        /// Re-query sites that already have a value
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sync { store, quiet } => sync::run_sync(&store, quiet),
        Commands::Enrich { action } => match action {
            EnrichAction::Established {
                store,
                quiet,
                force,
            } => enrich::run_established(&store, quiet, force),
            EnrichAction::PreviousNames {
                store,
                quiet,
                force,
            } => enrich::run_previous_names(&store, quiet, force),
        },
    }
}
