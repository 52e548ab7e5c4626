//! Site record types shared by the sync and enrichment passes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_true() -> bool {
    true
}

fn is_true(b: &bool) -> bool {
    *b
}

/// One NPS site (park, monument, historic site, ...) as stored in sites.json.
///
/// Fields the tooling doesn't know about (hand-edited additions such as
/// `nps_abolished`) land in `extra` and round-trip through serialization
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nps_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default)]
    pub has_stamps: bool,

    /// Present upstream as of the most recent sync. Stored only when false;
    /// an absent field means active.
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub active: bool,

    /// Established year ("YYYY" or "Unknown"), backfilled by `enrich established`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nps_established: Option<String>,
    /// Former official names, backfilled by `enrich previous-names`.
    /// Omitted entirely (not stored as `[]`) when a site never had any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_names: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for SiteRecord {
    fn default() -> Self {
        SiteRecord {
            name: String::new(),
            nps_link: None,
            description: None,
            photo_link: None,
            region: None,
            has_stamps: false,
            active: true,
            nps_established: None,
            previous_names: None,
            extra: Map::new(),
        }
    }
}

impl SiteRecord {
    /// Identity key: `nps_link` when non-empty, else `name` when non-empty.
    /// A record with neither has no identity and cannot be reconciled.
    pub fn key(&self) -> Option<&str> {
        match self.nps_link.as_deref() {
            Some(link) if !link.is_empty() => Some(link),
            _ if !self.name.is_empty() => Some(&self.name),
            _ => None,
        }
    }

    /// Shallow field-level merge: every field carried by `fresh` overrides
    /// the corresponding field of `self`, fields `fresh` doesn't carry are
    /// kept. Enrichment fields survive a sync this way, since fetched
    /// records never carry them.
    pub fn merged_with(&self, fresh: &SiteRecord) -> SiteRecord {
        let mut extra = self.extra.clone();
        for (k, v) in &fresh.extra {
            extra.insert(k.clone(), v.clone());
        }
        SiteRecord {
            name: fresh.name.clone(),
            nps_link: fresh.nps_link.clone().or_else(|| self.nps_link.clone()),
            description: fresh
                .description
                .clone()
                .or_else(|| self.description.clone()),
            photo_link: fresh.photo_link.clone().or_else(|| self.photo_link.clone()),
            region: fresh.region.clone().or_else(|| self.region.clone()),
            has_stamps: fresh.has_stamps,
            active: fresh.active,
            nps_established: fresh
                .nps_established
                .clone()
                .or_else(|| self.nps_established.clone()),
            previous_names: fresh
                .previous_names
                .clone()
                .or_else(|| self.previous_names.clone()),
            extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn site(name: &str, link: &str) -> SiteRecord {
        SiteRecord {
            name: name.to_string(),
            nps_link: if link.is_empty() {
                None
            } else {
                Some(link.to_string())
            },
            ..Default::default()
        }
    }

    #[test]
    fn key_prefers_link_over_name() {
        let s = site("Acadia", "https://www.nps.gov/acad/");
        assert_eq!(s.key(), Some("https://www.nps.gov/acad/"));
    }

    #[test]
    fn key_falls_back_to_name() {
        assert_eq!(site("Acadia", "").key(), Some("Acadia"));
        let empty_link = SiteRecord {
            nps_link: Some(String::new()),
            ..site("Acadia", "")
        };
        assert_eq!(empty_link.key(), Some("Acadia"));
    }

    #[test]
    fn key_absent_when_both_empty() {
        assert_eq!(site("", "").key(), None);
    }

    #[test]
    fn merge_preserves_fields_absent_from_fresh() {
        let existing = SiteRecord {
            nps_established: Some("1920".to_string()),
            previous_names: Some(vec!["Old Name".to_string()]),
            ..site("Acadia", "https://www.nps.gov/acad/")
        };
        let fresh = SiteRecord {
            description: Some("rocky coastline".to_string()),
            has_stamps: true,
            ..site("Acadia", "https://www.nps.gov/acad/")
        };

        let merged = existing.merged_with(&fresh);
        assert_eq!(merged.nps_established.as_deref(), Some("1920"));
        assert_eq!(
            merged.previous_names.as_deref(),
            Some(&["Old Name".to_string()][..])
        );
        assert_eq!(merged.description.as_deref(), Some("rocky coastline"));
        assert!(merged.has_stamps);
    }

    #[test]
    fn merge_overlays_extra_fields() {
        let mut existing = site("Acadia", "https://www.nps.gov/acad/");
        existing
            .extra
            .insert("nps_abolished".to_string(), json!(1950));
        existing.extra.insert("note".to_string(), json!("old"));
        let mut fresh = site("Acadia", "https://www.nps.gov/acad/");
        fresh.extra.insert("note".to_string(), json!("new"));

        let merged = existing.merged_with(&fresh);
        assert_eq!(merged.extra["nps_abolished"], json!(1950));
        assert_eq!(merged.extra["note"], json!("new"));
    }

    #[test]
    fn unknown_fields_round_trip() {
        let raw = json!({
            "name": "Fort Monroe National Monument",
            "nps_link": "https://www.nps.gov/fomr/",
            "has_stamps": true,
            "nps_abolished": 2011,
            "editor_note": "hand-added"
        });
        let record: SiteRecord = serde_json::from_value(raw.clone()).unwrap();
        assert!(record.active);
        assert_eq!(record.extra["nps_abolished"], json!(2011));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn active_serialized_only_when_false() {
        let mut s = site("Acadia", "");
        let v = serde_json::to_value(&s).unwrap();
        assert!(v.get("active").is_none());

        s.active = false;
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["active"], json!(false));
    }
}
