use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use geo::LineString;
use serde::{Deserialize, Serialize};

/// Every OSM way with a `highway` tag near the routes being classified.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WayNetwork {
    pub ways: Vec<Way>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Way {
    pub id: i64,
    pub highway: String,
    pub surface: Option<String>,
    pub name: Option<String>,
    pub geometry: LineString,
}

impl WayNetwork {
    pub fn load(path: &Path) -> Result<WayNetwork> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let network = bincode::deserialize_from(BufReader::new(file))
            .with_context(|| format!("decoding way network {}", path.display()))?;
        Ok(network)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        bincode::serialize_into(BufWriter::new(file), self)?;
        Ok(())
    }
}
