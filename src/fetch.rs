//! Blocking client for the developer.nps.gov API

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;

use crate::regions::region_for_states;
use crate::types::SiteRecord;
use crate::NPS_API_URL;

const PAGE_LIMIT: u32 = 50;

// NPS API response types. The API returns its pagination counters as
// strings ("total": "497").
#[derive(Debug, Deserialize)]
struct ApiPage<T> {
    total: String,
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct ParkData {
    #[serde(rename = "parkCode")]
    pub park_code: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub states: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<ParkImage>,
}

#[derive(Debug, Deserialize)]
pub struct ParkImage {
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct StampLocation {
    #[serde(default)]
    parks: Vec<StampLocationPark>,
}

#[derive(Debug, Deserialize)]
struct StampLocationPark {
    #[serde(rename = "parkCode")]
    park_code: String,
}

pub struct NpsClient {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl NpsClient {
    /// Build a client from the NPS_API_KEY environment variable.
    /// The missing-key case is a configuration error, not retryable.
    pub fn new() -> Result<Self> {
        let api_key = std::env::var("NPS_API_KEY")
            .context("NPS_API_KEY environment variable must be set")?;
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; NPSSitesCollector/1.0)")
            .build()?;
        Ok(Self { client, api_key })
    }

    fn get_page<T: DeserializeOwned>(&self, endpoint: &str, start: u32) -> Result<ApiPage<T>> {
        let url = format!(
            "{}/{}?limit={}&start={}",
            NPS_API_URL, endpoint, PAGE_LIMIT, start
        );
        self.client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .with_context(|| format!("Failed to fetch {} page at start={}", endpoint, start))?
            .error_for_status()
            .with_context(|| format!("NPS API rejected {} request", endpoint))?
            .json()
            .with_context(|| format!("Failed to parse {} JSON", endpoint))
    }

    /// Page through an endpoint until `total` records have been collected.
    fn fetch_all<T: DeserializeOwned>(&self, endpoint: &str, quiet: bool) -> Result<Vec<T>> {
        let mut collected: Vec<T> = Vec::new();
        let mut start = 0u32;

        loop {
            let page: ApiPage<T> = self.get_page(endpoint, start)?;
            let total: usize = page
                .total
                .parse()
                .with_context(|| format!("Unparseable total '{}' from {}", page.total, endpoint))?;

            if page.data.is_empty() {
                break;
            }
            collected.extend(page.data);

            if !quiet {
                eprintln!("  {}: {}/{}", endpoint, collected.len().min(total), total);
            }
            if collected.len() >= total {
                break;
            }
            start += PAGE_LIMIT;
        }

        Ok(collected)
    }

    pub fn fetch_parks(&self, quiet: bool) -> Result<Vec<ParkData>> {
        if !quiet {
            eprintln!("Fetching parks from NPS API...");
        }
        self.fetch_all("parks", quiet)
    }

    /// Park codes that have at least one passport stamp location.
    pub fn fetch_stamped_park_codes(&self, quiet: bool) -> Result<HashSet<String>> {
        if !quiet {
            eprintln!("Fetching passport stamp locations from NPS API...");
        }
        let locations: Vec<StampLocation> = self.fetch_all("passportstamplocations", quiet)?;
        Ok(locations
            .into_iter()
            .flat_map(|loc| loc.parks)
            .map(|park| park.park_code)
            .collect())
    }
}

/// Build the site record for one fetched park.
pub fn site_from_park(park: &ParkData, stamped: &HashSet<String>) -> SiteRecord {
    let non_empty = |s: &str| {
        if s.is_empty() {
            None
        } else {
            Some(s.to_string())
        }
    };
    SiteRecord {
        name: park.full_name.clone(),
        nps_link: non_empty(&park.url),
        description: non_empty(&park.description),
        photo_link: park.images.first().map(|img| img.url.clone()),
        region: region_for_states(&park.states).map(str::to_string),
        has_stamps: stamped.contains(&park.park_code),
        ..Default::default()
    }
}

/// Fetch the full fresh site list for this run.
pub fn fetch_sites(client: &NpsClient, quiet: bool) -> Result<Vec<SiteRecord>> {
    let parks = client.fetch_parks(quiet)?;
    let stamped = client.fetch_stamped_park_codes(quiet)?;
    Ok(parks
        .iter()
        .map(|park| site_from_park(park, &stamped))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn park() -> ParkData {
        ParkData {
            park_code: "acad".to_string(),
            full_name: "Acadia National Park".to_string(),
            url: "https://www.nps.gov/acad/index.htm".to_string(),
            states: "ME".to_string(),
            description: "Rocky coastline of Maine.".to_string(),
            images: vec![ParkImage {
                url: "https://www.nps.gov/common/uploads/acad.jpg".to_string(),
            }],
        }
    }

    #[test]
    fn park_maps_to_site_record() {
        let stamped: HashSet<String> = ["acad".to_string()].into_iter().collect();
        let site = site_from_park(&park(), &stamped);

        assert_eq!(site.name, "Acadia National Park");
        assert_eq!(
            site.nps_link.as_deref(),
            Some("https://www.nps.gov/acad/index.htm")
        );
        assert_eq!(site.region.as_deref(), Some("Northeast"));
        assert_eq!(
            site.photo_link.as_deref(),
            Some("https://www.nps.gov/common/uploads/acad.jpg")
        );
        assert!(site.has_stamps);
        assert!(site.active);
        assert!(site.nps_established.is_none());
    }

    #[test]
    fn sparse_park_yields_absent_fields() {
        let sparse = ParkData {
            url: String::new(),
            states: String::new(),
            description: String::new(),
            images: Vec::new(),
            ..park()
        };
        let site = site_from_park(&sparse, &HashSet::new());

        assert_eq!(site.key(), Some("Acadia National Park"));
        assert!(site.nps_link.is_none());
        assert!(site.description.is_none());
        assert!(site.photo_link.is_none());
        assert!(site.region.is_none());
        assert!(!site.has_stamps);
    }

    #[test]
    fn stamp_location_parses() {
        let raw = r#"{"total": "1", "data": [
            {"id": "X", "label": "Visitor Center",
             "parks": [{"parkCode": "acad", "states": "ME"}]}
        ]}"#;
        let page: ApiPage<StampLocation> = serde_json::from_str(raw).unwrap();
        assert_eq!(page.total, "1");
        assert_eq!(page.data[0].parks[0].park_code, "acad");
    }
}
