use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A named start/end location from the location database. Extra CSV columns are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

pub fn load_locations(path: &Path) -> Result<Vec<Location>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_locations(file).with_context(|| format!("reading {}", path.display()))
}

pub fn parse_locations<R: Read>(input: R) -> Result<Vec<Location>> {
    let mut reader = csv::Reader::from_reader(input);
    let mut locations = Vec::new();
    for row in reader.deserialize() {
        locations.push(row?);
    }
    Ok(locations)
}
