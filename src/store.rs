//! Reading and writing the persisted sites.json dataset

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::types::SiteRecord;

/// Load the site store. An unreadable or missing file is the first-run case
/// and yields an empty list; a file that reads but isn't valid JSON is fatal,
/// since overwriting it would destroy data.
pub fn load_sites(path: &Path) -> Result<Vec<SiteRecord>> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()),
    };
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse site store: {}", path.display()))
}

/// Rewrite the site store in full, pretty-printed with a trailing newline.
pub fn save_sites(path: &Path, sites: &[SiteRecord]) -> Result<()> {
    let mut json = serde_json::to_string_pretty(sites)?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("Failed to write site store: {}", path.display()))
}
