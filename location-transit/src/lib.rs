//! Labels every location in the location database with how to get there by transit, and how
//! reachable it is from a few hub locations.

mod table;

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use geo::{Distance, Haversine, Point};
use log::{info, warn};
use serde::Deserialize;

pub use table::LocationTable;

pub const DISTANCE_MATRIX_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Reachability is judged by transit time to these locations.
pub const DEFAULT_HUBS: [&str; 3] = ["CSE", "GreenLake", "Beacon"];

pub const MAX_REACHABILITY: u32 = 3;

/// A stop closer than this serves a location.
pub const NEAR_STOP_METERS: f64 = 5.0;

pub const NO_NEARBY_STOP: &str = "Bus or Drive";

#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub name: String,
    pub system: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize)]
struct StopRow {
    stop_name: String,
    stop_lat: f64,
    stop_lon: f64,
}

/// Adds every stop from a CSV with `stop_name`, `stop_lat` and `stop_lon` columns, all belonging
/// to `system`. A stop name seen before is replaced in place.
pub fn add_stops<R: Read>(stops: &mut Vec<Stop>, system: &str, input: R) -> Result<()> {
    let mut reader = csv::Reader::from_reader(input);
    for row in reader.deserialize() {
        let row: StopRow = row?;
        let stop = Stop {
            name: row.stop_name,
            system: system.to_string(),
            lat: row.stop_lat,
            lon: row.stop_lon,
        };
        match stops.iter_mut().find(|existing| existing.name == stop.name) {
            Some(existing) => *existing = stop,
            None => stops.push(stop),
        }
    }
    Ok(())
}

pub fn load_stops(stops: &mut Vec<Stop>, system: &str, path: &Path) -> Result<()> {
    let file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    add_stops(stops, system, file).with_context(|| format!("reading {}", path.display()))
}

/// "<system> to <stop> stop" for the first stop serving the point, otherwise "Bus or Drive".
pub fn transit_label(pt: Point, stops: &[Stop]) -> String {
    stops
        .iter()
        .find(|stop| Haversine.distance(pt, Point::new(stop.lon, stop.lat)) < NEAR_STOP_METERS)
        .map(|stop| format!("{} to {} stop", stop.system, stop.name))
        .unwrap_or_else(|| NO_NEARBY_STOP.to_string())
}

/// 1 when every hub is under half an hour away, plus one per extra whole half hour to the
/// farthest hub, capped at `MAX_REACHABILITY`. No durations at all is the worst score.
pub fn reachability(durations_sec: &[f64]) -> u32 {
    let Some(longest) = durations_sec.iter().copied().reduce(f64::max) else {
        return MAX_REACHABILITY;
    };
    let half_hours = (longest / 60.0 / 30.0) as u32;
    MAX_REACHABILITY.min(half_hours.saturating_add(1))
}

/// 8:30 on the next Saturday, which is today if today is a Saturday.
pub fn next_saturday_arrival(today: NaiveDate) -> NaiveDateTime {
    let days = (5 + 7 - today.weekday().num_days_from_monday()) % 7;
    let saturday = today + Days::new(days.into());
    saturday.and_time(NaiveTime::from_hms_opt(8, 30, 0).unwrap_or_default())
}

/// Anything that knows how long transit takes from one place to several others. Answers are in
/// seconds, leaving out destinations with no route.
pub trait TravelTimeSource {
    fn transit_durations(&mut self, from: Point, to: &[Point]) -> Result<Vec<f64>>;
}

/// Asks the Google Distance Matrix API, arriving at a fixed time.
pub struct DistanceMatrixClient {
    client: reqwest::blocking::Client,
    url: String,
    key: String,
    arrival_time: i64,
}

impl DistanceMatrixClient {
    /// `arrival_time` is in seconds since the epoch.
    pub fn new(url: &str, key: &str, arrival_time: i64) -> Result<Self> {
        Ok(Self {
            client: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()?,
            url: url.to_string(),
            key: key.to_string(),
            arrival_time,
        })
    }
}

impl TravelTimeSource for DistanceMatrixClient {
    fn transit_durations(&mut self, from: Point, to: &[Point]) -> Result<Vec<f64>> {
        let destinations = to
            .iter()
            .map(|pt| format!("{},{}", pt.y(), pt.x()))
            .collect::<Vec<_>>()
            .join("|");
        let resp = self
            .client
            .get(&self.url)
            .query(&[
                ("destinations", destinations),
                ("origins", format!("{},{}", from.y(), from.x())),
                ("mode", "transit".to_string()),
                ("key", self.key.clone()),
                ("arrival_time", self.arrival_time.to_string()),
            ])
            .send()
            .with_context(|| format!("querying transit times from {}, {}", from.y(), from.x()))?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            bail!("distance matrix request failed with status {status}");
        }
        parse_distance_matrix(&body)
    }
}

#[derive(Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Deserialize)]
struct MatrixElement {
    duration: Option<MatrixDuration>,
}

#[derive(Deserialize)]
struct MatrixDuration {
    value: f64,
}

/// Every duration in a Distance Matrix response, in seconds. Elements without a route carry no
/// duration and are skipped.
pub fn parse_distance_matrix(body: &str) -> Result<Vec<f64>> {
    let resp: MatrixResponse = serde_json::from_str(body)?;
    if resp.status != "OK" {
        bail!(
            "distance matrix answered {}: {}",
            resp.status,
            resp.error_message.unwrap_or_default()
        );
    }
    Ok(resp
        .rows
        .into_iter()
        .flat_map(|row| row.elements)
        .filter_map(|element| element.duration)
        .map(|duration| duration.value)
        .collect())
}

/// Fills in the `transit` and `reachability` columns of every location, adding either column if
/// it's missing. A location whose travel times can't be fetched keeps its old reachability.
pub fn update_transit(
    table: &mut LocationTable,
    stops: &[Stop],
    hub_ids: &[&str],
    source: &mut dyn TravelTimeSource,
) -> Result<()> {
    let mut hubs = Vec::new();
    for id in hub_ids {
        match table.find(id) {
            Some(row) => hubs.push(table.point(row)?),
            None => warn!("Hub {id} isn't in the location database"),
        }
    }

    let transit_column = table.column_or_insert("transit");
    let reachability_column = table.column_or_insert("reachability");
    for row in 0..table.len() {
        let id = table.id(row).to_string();
        let pt = table.point(row)?;
        info!("Processing {id}");
        table.set(row, transit_column, transit_label(pt, stops));
        match source.transit_durations(pt, &hubs) {
            Ok(durations) => {
                table.set(row, reachability_column, reachability(&durations).to_string())
            }
            Err(err) => warn!("Keeping the old reachability for {id}: {err:#}"),
        }
    }
    Ok(())
}
