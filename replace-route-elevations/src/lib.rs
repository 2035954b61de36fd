//! Fills in (or replaces) route elevations with values from the USGS Elevation Point Query
//! Service, caching every answer on disk.


use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{info, warn};

use normalize_gpx::route_gpx;
use route_model::{load_route, Route};

pub const EPQS_URL: &str = "https://epqs.nationalmap.gov/v1/json";

/// Anything that can answer "how high is the ground here", in meters.
pub trait ElevationSource {
    fn elevation(&mut self, lat: f64, lon: f64) -> Result<f64>;
}

/// Asks the USGS service one point at a time, pausing between requests.
pub struct EpqsClient {
    client: reqwest::blocking::Client,
    url: String,
    wait: Duration,
}

impl EpqsClient {
    pub fn new(url: &str, wait: Duration) -> Result<Self> {
        Ok(Self {
            client: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()?,
            url: url.to_string(),
            wait,
        })
    }
}

impl ElevationSource for EpqsClient {
    fn elevation(&mut self, lat: f64, lon: f64) -> Result<f64> {
        let resp = self
            .client
            .get(&self.url)
            .query(&[
                ("x", lon.to_string()),
                ("y", lat.to_string()),
                ("units", "Meters".to_string()),
            ])
            .send()
            .with_context(|| format!("querying elevation for {lat}, {lon}"))?;
        let status = resp.status();
        let body = resp.text()?;
        thread::sleep(self.wait);

        // The service sometimes answers 200 with an empty body when it's rate limiting
        match parse_epqs_value(&body) {
            Some(value) => Ok(value),
            None => bail!(
                "no elevation for {lat}, {lon} (status {status}, body {body:?}). Consider waiting \
                 an hour and increasing --wait"
            ),
        }
    }
}

/// The `value` field of an EPQS response, which may be a number or a numeric string.
pub fn parse_epqs_value(body: &str) -> Option<f64> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    match json.get("value")? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Remembers every answer from another source, keyed by the exact coordinates asked about.
pub struct CachedElevations<S> {
    source: S,
    cache: HashMap<(u64, u64), f64>,
    path: Option<PathBuf>,
    hits: usize,
    misses: usize,
}

impl<S: ElevationSource> CachedElevations<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: HashMap::new(),
            path: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Start from the cache file at `path`, if it exists. `save` writes back to it.
    pub fn load(source: S, path: &Path) -> Result<Self> {
        let mut cached = Self::new(source);
        cached.path = Some(path.to_path_buf());
        if path.exists() {
            let file = File::open(path)?;
            cached.cache = bincode::deserialize_from(BufReader::new(file))
                .with_context(|| format!("decoding elevation cache {}", path.display()))?;
            info!(
                "Loaded {} cached elevations from {}",
                cached.cache.len(),
                path.display()
            );
        }
        Ok(cached)
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = File::create(path)?;
        bincode::serialize_into(BufWriter::new(file), &self.cache)?;
        info!(
            "Saved {} elevations to {} ({} hits, {} misses)",
            self.cache.len(),
            path.display(),
            self.hits,
            self.misses
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl<S: ElevationSource> ElevationSource for CachedElevations<S> {
    fn elevation(&mut self, lat: f64, lon: f64) -> Result<f64> {
        let key = (lat.to_bits(), lon.to_bits());
        if let Some(value) = self.cache.get(&key) {
            self.hits += 1;
            return Ok(*value);
        }
        self.misses += 1;
        let value = self.source.elevation(lat, lon)?;
        self.cache.insert(key, value);
        Ok(value)
    }
}

/// Fill in missing (or 0m) elevations, or every elevation with `overwrite`. Returns how many
/// points changed.
pub fn replace_elevations(
    route: &mut Route,
    source: &mut dyn ElevationSource,
    overwrite: bool,
) -> Result<usize> {
    let mut replaced = 0;
    for pt in &mut route.points {
        if pt.recorded_elevation().is_some() && !overwrite {
            continue;
        }
        pt.elevation = Some(source.elevation(pt.lat, pt.lon)?);
        replaced += 1;
    }
    if replaced == 0 {
        warn!("{} already has every elevation", route.id);
    }
    Ok(replaced)
}

/// Updates each input route and writes it to the matching output path. Stops at the first
/// failure; the caller should still save any cache behind `source`.
pub fn update_routes(
    inputs: &[PathBuf],
    outputs: &[PathBuf],
    source: &mut dyn ElevationSource,
    overwrite: bool,
) -> Result<()> {
    if inputs.len() != outputs.len() {
        bail!("The number of inputs must match the number of outputs");
    }
    for (input, output) in inputs.iter().zip(outputs) {
        let mut route = load_route(input)?;
        let replaced = replace_elevations(&mut route, source, overwrite)?;
        info!("{}: replaced {replaced} elevations", route.id);
        std::fs::write(output, route_gpx(&route))
            .with_context(|| format!("writing {}", output.display()))?;
    }
    Ok(())
}
