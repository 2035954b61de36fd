use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use normalize_gpx::route_gpx;
use route_metrics::{check_measurements, compute_route_metrics, fill_endpoints};
use route_model::{load_locations, load_route};

#[derive(Parser)]
struct Args {
    /// GPX route files to normalize
    #[arg(long, num_args = 1.., required = true)]
    input: Vec<PathBuf>,

    /// Where to write each normalized route, in the same order as --input
    #[arg(long, num_args = 1.., required = true)]
    output: Vec<PathBuf>,

    /// CSV of known start/end locations
    #[arg(long)]
    locs: PathBuf,
}

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;
    let args = Args::parse();
    if args.input.len() != args.output.len() {
        bail!("The number of inputs must match the number of outputs");
    }
    let locations = load_locations(&args.locs)?;

    for (input, output) in args.input.iter().zip(&args.output) {
        let mut route = load_route(input)?;
        route.check_path()?;

        let computed = compute_route_metrics(&route.points)?;
        for issue in check_measurements(&route, &computed, &locations) {
            log::warn!("{}: {issue}", route.id);
        }
        fill_endpoints(&mut route, &locations);

        std::fs::write(output, route_gpx(&route))?;
        log::info!("Normalized {} into {}", route.id, output.display());
    }
    Ok(())
}
