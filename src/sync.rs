//! The `sync` command: fetch, reconcile, rewrite the store

use anyhow::Result;
use std::path::Path;

use crate::fetch::{fetch_sites, NpsClient};
use crate::reconcile::reconcile;
use crate::store::{load_sites, save_sites};

/// Fetch the current NPS site list, reconcile it into the store at `store`,
/// rewrite the store, and emit the merged dataset on stdout. Progress goes
/// to stderr so stdout stays a clean data channel.
pub fn run_sync(store: &str, quiet: bool) -> Result<()> {
    let client = NpsClient::new()?;
    let store_path = Path::new(store);

    let existing = load_sites(store_path)?;
    if !quiet {
        eprintln!("Loaded {} existing sites from {}", existing.len(), store);
    }

    let fresh = fetch_sites(&client, quiet)?;
    let merged = reconcile(&existing, &fresh);

    save_sites(store_path, &merged)?;

    let inactive = merged.iter().filter(|site| !site.active).count();
    if !quiet {
        eprintln!(
            "Done! Wrote {} sites to {} ({} active, {} inactive)",
            merged.len(),
            store,
            merged.len() - inactive,
            inactive
        );
    }

    println!("{}", serde_json::to_string_pretty(&merged)?);
    Ok(())
}
