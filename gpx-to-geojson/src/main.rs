use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use gpx_to_geojson::{merge_feature_collections, route_feature, write_compact};
use route_model::load_route;

#[derive(Parser)]
struct Args {
    /// GPX route files to convert
    #[arg(long, num_args = 1.., required = true)]
    input: Vec<PathBuf>,

    /// Where to write each GeoJSON Feature, in the same order as --input
    #[arg(long, num_args = 1.., required = true)]
    output: Vec<PathBuf>,

    /// Also merge every output into one FeatureCollection here
    #[arg(long)]
    merged: Option<PathBuf>,
}

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;
    let args = Args::parse();
    if args.input.len() != args.output.len() {
        bail!("The number of inputs must match the number of outputs");
    }

    for (input, output) in args.input.iter().zip(&args.output) {
        let route = load_route(input)?;
        std::fs::write(output, write_compact(&route_feature(&route))?)?;
    }
    log::info!("Converted {} routes", args.input.len());

    if let Some(merged) = args.merged {
        if args.output.contains(&merged) || args.input.contains(&merged) {
            bail!("The merged output must not be one of the inputs");
        }
        let fc = merge_feature_collections(&args.output)?;
        let mut text = serde_json::to_string(&fc)?;
        text.push('\n');
        std::fs::write(&merged, text)?;
        log::info!("Merged {} features into {}", fc.features.len(), merged.display());
    }
    Ok(())
}
