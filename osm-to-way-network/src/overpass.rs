use std::time::Duration;

use anyhow::{Context, Result};
use geo::Rect;
use log::info;

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Every `highway` way in the box, plus the nodes they reference, as OSM XML.
pub fn overpass_query(bbox: Rect) -> String {
    let (min, max) = (bbox.min(), bbox.max());
    // Overpass wants (south, west, north, east)
    format!(
        "[out:xml][timeout:180];(way[\"highway\"]({},{},{},{}););(._;>;);out body;",
        min.y, min.x, max.y, max.x
    )
}

pub struct OverpassClient {
    url: String,
    client: reqwest::blocking::Client,
}

impl OverpassClient {
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    pub fn fetch(&self, bbox: Rect) -> Result<Vec<u8>> {
        info!("Querying {} for ways in {:?}", self.url, bbox);
        let resp = self
            .client
            .post(&self.url)
            .form(&[("data", overpass_query(bbox))])
            .send()
            .with_context(|| format!("querying {}", self.url))?
            .error_for_status()?;
        let bytes = resp.bytes()?;
        info!("Downloaded {} bytes of OSM XML", bytes.len());
        Ok(bytes.to_vec())
    }
}
