use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use osm_to_way_network::{fetch_network, scrape_ways, OverpassClient, DEFAULT_OVERPASS_URL};
use route_model::load_routes;

#[derive(Parser)]
struct Args {
    /// Path to a .osm.pbf or .xml file to convert
    #[arg(long)]
    osm: Option<PathBuf>,

    /// Instead of reading a file, download ways around these GPX routes from Overpass
    #[arg(long, num_args = 1..)]
    routes: Vec<PathBuf>,

    /// Degrees to grow the routes' bounding box by before downloading
    #[arg(long, default_value_t = 0.01)]
    padding: f64,

    /// Overpass API endpoint
    #[arg(long, default_value = DEFAULT_OVERPASS_URL)]
    overpass_url: String,

    /// Output file to write
    #[arg(long, default_value = "ways.bin")]
    output: PathBuf,
}

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;
    let args = Args::parse();

    let network = match (args.osm, args.routes.is_empty()) {
        (Some(path), true) => scrape_ways(&std::fs::read(path)?, None)?,
        (None, false) => {
            let routes = load_routes(&args.routes)?;
            let client = OverpassClient::new(&args.overpass_url)?;
            fetch_network(&client, &routes, args.padding)?
        }
        _ => bail!("pass exactly one of --osm or --routes"),
    };

    network.save(&args.output)?;
    log::info!(
        "Wrote {} ways to {}",
        network.ways.len(),
        args.output.display()
    );
    Ok(())
}
