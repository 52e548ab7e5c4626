//! Merge a freshly fetched site list into the previously persisted one

use std::collections::{HashMap, HashSet};

use crate::types::SiteRecord;

/// Key -> record index preserving first-seen key order.
///
/// Duplicate keys within one input keep the later record (last write wins)
/// and empty-key records are dropped; both are data-quality problems in the
/// input, so they are warned about rather than silently absorbed.
fn index_by_key<'a>(records: &'a [SiteRecord], label: &str) -> Vec<(&'a str, &'a SiteRecord)> {
    let mut order: Vec<(&str, &SiteRecord)> = Vec::with_capacity(records.len());
    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(records.len());

    for record in records {
        let Some(key) = record.key() else {
            eprintln!(
                "warning: {} record with no nps_link or name dropped from merge",
                label
            );
            continue;
        };
        match seen.get(key) {
            Some(&pos) => {
                eprintln!(
                    "warning: duplicate key '{}' in {} records, keeping the later entry",
                    key, label
                );
                order[pos].1 = record;
            }
            None => {
                seen.insert(key, order.len());
                order.push((key, record));
            }
        }
    }

    order
}

/// Reconcile the persisted site list with a fresh fetch.
///
/// Every fresh record is upserted: merged field-by-field onto the existing
/// record with the same key when there is one (fresh values win, fields the
/// fetch doesn't carry are preserved), taken as-is otherwise. Existing
/// records whose key no longer appears upstream are kept with `active`
/// forced to false; a site that later reappears is revived by the upsert
/// path. No record is ever deleted, and every key from either input appears
/// exactly once in the output. Output order is upserts first (fetch order),
/// then newly inactivated records (stored order).
pub fn reconcile(existing: &[SiteRecord], fresh: &[SiteRecord]) -> Vec<SiteRecord> {
    let existing_by_key = index_by_key(existing, "existing");
    let fresh_by_key = index_by_key(fresh, "fresh");

    let existing_lookup: HashMap<&str, &SiteRecord> = existing_by_key.iter().copied().collect();
    let fresh_keys: HashSet<&str> = fresh_by_key.iter().map(|&(k, _)| k).collect();

    let mut merged = Vec::with_capacity(fresh_by_key.len() + existing_by_key.len());

    for (key, new) in &fresh_by_key {
        match existing_lookup.get(key) {
            Some(old) => merged.push(old.merged_with(new)),
            None => merged.push((*new).clone()),
        }
    }

    for (key, old) in &existing_by_key {
        if !fresh_keys.contains(key) {
            let mut retired = (*old).clone();
            retired.active = false;
            merged.push(retired);
        }
    }

    merged
}
