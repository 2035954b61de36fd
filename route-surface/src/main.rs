use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Parser;
use geojson::{Feature, FeatureCollection};
use rayon::prelude::*;

use osm_to_way_network::{fetch_network, OverpassClient, DEFAULT_OVERPASS_URL};
use route_model::{load_route, Route, WayNetwork};
use route_surface::{
    add_surface_tags, percentages_from_segments, segment_feature, surface_segments,
    DistanceMetric, SurfaceIndex, DEFAULT_BUFFER_METERS,
};

#[derive(Parser)]
struct Args {
    /// GPX route files to classify
    #[arg(long, num_args = 1.., required = true)]
    input: Vec<PathBuf>,

    /// Where to write each route with surface tags added, in the same order as --input
    #[arg(long, num_args = 1.., required = true)]
    output: Vec<PathBuf>,

    /// A way network from osm-to-way-network. If missing, ways are downloaded from Overpass.
    #[arg(long)]
    network: Option<PathBuf>,

    /// Overpass API endpoint, used without --network
    #[arg(long, default_value = DEFAULT_OVERPASS_URL)]
    overpass_url: String,

    /// Degrees to grow the routes' bounding box by before downloading
    #[arg(long, default_value_t = 0.005)]
    padding: f64,

    /// Also write every classified segment to this GeoJSON file
    #[arg(long)]
    geojson: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_BUFFER_METERS)]
    buffer_meters: f64,

    /// Measure the buffer and the nearest way in true meters instead of Web Mercator units
    #[arg(long)]
    true_meters: bool,
}

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;
    let args = Args::parse();
    if args.input.len() != args.output.len() {
        bail!("The number of inputs must match the number of outputs");
    }

    log::info!("Loading {} routes", args.input.len());
    let mut routes = Vec::new();
    for path in &args.input {
        let route = load_route(path)?;
        route.check_path()?;
        routes.push(route);
    }

    let network = match args.network {
        Some(path) => WayNetwork::load(&path)?,
        None => {
            let client = OverpassClient::new(&args.overpass_url)?;
            fetch_network(&client, &routes, args.padding)?
        }
    };
    let metric = if args.true_meters {
        DistanceMetric::LocalMeters
    } else {
        DistanceMetric::WebMercator
    };
    let index = SurfaceIndex::with_metric(&network, args.buffer_meters, metric);

    let results: Vec<Option<Vec<Feature>>> = routes
        .par_iter()
        .zip(&args.output)
        .map(|(route, output)| match classify_route(route, output, &index) {
            Ok(features) => Some(features),
            Err(err) => {
                log::error!("Skipping {}: {err:#}", route.id);
                None
            }
        })
        .collect();
    let failed = results.iter().filter(|x| x.is_none()).count();
    log::info!("Classified {} routes, {failed} failed", results.len() - failed);

    if let Some(path) = args.geojson {
        let features: Vec<Feature> = results.into_iter().flatten().flatten().collect();
        if features.is_empty() {
            log::warn!("No segments to write to {}", path.display());
        } else {
            let gj = geojson::GeoJson::from(features.into_iter().collect::<FeatureCollection>());
            serde_json::to_writer_pretty(BufWriter::new(File::create(&path)?), &gj)?;
            log::info!("Wrote segments to {}", path.display());
        }
    }
    Ok(())
}

fn classify_route(route: &Route, output: &Path, index: &SurfaceIndex) -> Result<Vec<Feature>> {
    let segments = surface_segments(&route.points, index, &route.id);
    let percentages = if index.is_empty() {
        Default::default()
    } else {
        percentages_from_segments(&segments)
    };
    log::info!(
        "{}: paved {}%, unpaved {}%, street {}%, trail {}%, sidewalk {}%, stairs {}%",
        route.id,
        percentages.paved,
        percentages.unpaved,
        percentages.street,
        percentages.trail,
        percentages.sidewalk,
        percentages.stairs
    );

    let text = std::fs::read_to_string(&route.path)?;
    std::fs::write(output, add_surface_tags(&text, &percentages)?)?;
    Ok(segments.iter().map(segment_feature).collect())
}
