//! Shared types for the route tools: routes loaded from GPX, the location database, and the OSM
//! way network used for surface classification.

mod error;
mod extensions;
mod load;
mod locations;
mod network;
#[cfg(test)]
mod tests;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use geo::{Coord, LineString, Point};
use serde::{Deserialize, Serialize};

pub use error::RouteError;
pub use extensions::{parse_extensions, Extensions};
pub use load::{load_route, load_routes, route_from_gpx_str};
pub use locations::{load_locations, parse_locations, Location};
pub use network::{Way, WayNetwork};

/// One GPS fix along a route.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    pub elevation: Option<f64>,
}

impl TrackPoint {
    pub fn new(lat: f64, lon: f64, elevation: Option<f64>) -> Self {
        Self {
            lat,
            lon,
            elevation,
        }
    }

    /// As a geo point, x = longitude and y = latitude.
    pub fn point(&self) -> Point {
        Point::new(self.lon, self.lat)
    }

    /// The elevation, unless it's missing or 0m. Route files write an unknown elevation as 0.
    pub fn recorded_elevation(&self) -> Option<f64> {
        self.elevation.filter(|ele| *ele != 0.0)
    }

    pub fn coord(&self) -> Coord {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RouteType {
    Loop,
    #[serde(rename = "OB")]
    OutAndBack,
    #[serde(rename = "P2P")]
    PointToPoint,
}

impl RouteType {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteType::Loop => "Loop",
            RouteType::OutAndBack => "OB",
            RouteType::PointToPoint => "P2P",
        }
    }

    /// Guess the type from the id naming conventions: `-ob` (or a truncated `-o`), `-loop` and
    /// `-loop-NN` suffixes, and a `p2p` prefix.
    pub fn from_id(id: &str) -> Option<RouteType> {
        if id.ends_with("-ob") || id.ends_with("-o") {
            Some(RouteType::OutAndBack)
        } else if is_loop_id(id) {
            Some(RouteType::Loop)
        } else if id.starts_with("p2p") {
            Some(RouteType::PointToPoint)
        } else {
            None
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Loop" => Ok(RouteType::Loop),
            "OB" => Ok(RouteType::OutAndBack),
            "P2P" => Ok(RouteType::PointToPoint),
            other => Err(format!("unknown route type '{other}'")),
        }
    }
}

/// True for ids ending in `-loop` or `-loop-NN`.
pub fn is_loop_id(id: &str) -> bool {
    if id.ends_with("-loop") {
        return true;
    }
    match id.rsplit_once("-loop-") {
        Some((_, suffix)) => suffix.len() == 2 && suffix.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub date: String,
    pub note: String,
}

/// Fractions of a route's length per surface class, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceShares {
    pub paved: f64,
    pub unpaved: f64,
    pub street: f64,
    pub trail: f64,
    pub sidewalk: f64,
    pub stairs: f64,
}

#[derive(Clone, Debug)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub distance_mi: f64,
    pub ascent_m: Option<f64>,
    pub descent_m: Option<f64>,
    pub route_type: Option<RouteType>,
    pub surface: Option<String>,
    pub map: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub deprecated: bool,
    pub notes: Option<String>,
    pub last_updated: Option<String>,
    pub changelog: Vec<Change>,
    pub surface_shares: Option<SurfaceShares>,
    pub points: Vec<TrackPoint>,
    pub path: PathBuf,
}

impl Route {
    pub fn line_string(&self) -> LineString {
        self.points.iter().map(|pt| pt.coord()).collect()
    }

    /// Route files must be named after their id.
    pub fn check_path(&self) -> Result<(), RouteError> {
        let expected = format!("{}.gpx", self.id);
        if self.path.file_name().and_then(|x| x.to_str()) != Some(expected.as_str()) {
            return Err(RouteError::RoguePath {
                path: self.path.clone(),
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}
