use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, TimeZone};
use clap::Parser;

use location_transit::{
    load_stops, next_saturday_arrival, update_transit, DistanceMatrixClient, LocationTable,
    DEFAULT_HUBS, DISTANCE_MATRIX_URL,
};

#[derive(Parser)]
struct Args {
    /// The location database, updated in place
    #[arg(long, default_value = "routes/locs.csv")]
    locations: PathBuf,

    /// Transit stops as SYSTEM=PATH, where PATH is a CSV with stop_name, stop_lat and stop_lon
    /// columns. Repeat for each system; earlier stops win when several serve a location.
    #[arg(long, value_parser = parse_stops_arg)]
    stops: Vec<(String, PathBuf)>,

    /// Location ids whose transit time decides reachability
    #[arg(long, num_args = 1.., default_values = DEFAULT_HUBS)]
    hubs: Vec<String>,

    /// File holding a Google Maps API key
    #[arg(long, default_value = "_api_keys/google_maps")]
    api_key_file: PathBuf,

    /// Distance Matrix API endpoint
    #[arg(long, default_value = DISTANCE_MATRIX_URL)]
    distance_matrix_url: String,
}

fn parse_stops_arg(arg: &str) -> Result<(String, PathBuf), String> {
    match arg.split_once('=') {
        Some((system, path)) if !system.is_empty() && !path.is_empty() => {
            Ok((system.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected SYSTEM=PATH, not {arg}")),
    }
}

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;
    let args = Args::parse();

    let mut stops = Vec::new();
    for (system, path) in &args.stops {
        load_stops(&mut stops, system, path)?;
    }
    log::info!("Loaded {} transit stops", stops.len());

    let key = std::fs::read_to_string(&args.api_key_file)
        .with_context(|| format!("reading {}", args.api_key_file.display()))?;
    let arrival = next_saturday_arrival(Local::now().date_naive());
    let Some(arrival_time) = Local.from_local_datetime(&arrival).earliest() else {
        bail!("{arrival} doesn't exist in the local time zone");
    };
    let mut client =
        DistanceMatrixClient::new(&args.distance_matrix_url, key.trim(), arrival_time.timestamp())?;

    let mut table = LocationTable::load(&args.locations)?;
    let hubs: Vec<&str> = args.hubs.iter().map(String::as_str).collect();
    update_transit(&mut table, &stops, &hubs, &mut client)?;
    table.save(&args.locations)?;
    log::info!("Updated {} locations", table.len());
    Ok(())
}
