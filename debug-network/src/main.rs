use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use debug_network::network_geojson;
use route_model::WayNetwork;

#[derive(Parser)]
struct Args {
    /// A ways.bin file produced by osm-to-way-network
    #[arg(long)]
    input: PathBuf,

    #[arg(long, default_value = "debug.geojson")]
    output: PathBuf,
}

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;
    let args = Args::parse();

    let network = WayNetwork::load(&args.input)?;
    let gj = geojson::GeoJson::from(network_geojson(&network));
    std::fs::write(&args.output, serde_json::to_string_pretty(&gj)?)?;
    log::info!(
        "Wrote {} ways to {}",
        network.ways.len(),
        args.output.display()
    );
    Ok(())
}
