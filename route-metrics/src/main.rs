use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use rayon::prelude::*;

use route_metrics::{sort_summaries, summarize_route, NeighborhoodIndex, SummaryContext};
use route_model::{load_locations, load_route};

#[derive(Parser)]
struct Args {
    /// GPX route files to measure
    #[arg(long, num_args = 1.., required = true)]
    input: Vec<PathBuf>,

    /// CSV of known start/end locations, with id, lat and lon columns
    #[arg(long)]
    locs: PathBuf,

    /// GeoJSON FeatureCollection of neighborhood polygons
    #[arg(long)]
    neighborhoods: Option<PathBuf>,

    /// Neighborhood property holding the fine-grained name
    #[arg(long, default_value = "S_HOOD")]
    fine_property: String,

    /// Neighborhood property holding the larger district name
    #[arg(long, default_value = "L_HOOD")]
    coarse_property: String,

    /// Label for routes outside every neighborhood
    #[arg(long, default_value = "non-Seattle")]
    outside_label: String,

    /// Write the sorted route table here as JSON
    #[arg(long)]
    output: Option<PathBuf>,

    /// Measure ascent and descent from smoothed elevations
    #[arg(long)]
    smooth: bool,

    /// Fail if any route has an issue
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;
    let args = Args::parse();

    let locations = load_locations(&args.locs)?;
    let neighborhoods = match args.neighborhoods {
        Some(path) => Some(
            NeighborhoodIndex::from_geojson(
                &std::fs::read_to_string(path)?,
                &args.fine_property,
                &args.coarse_property,
            )?
            .with_outside_label(&args.outside_label),
        ),
        None => None,
    };
    let ctx = SummaryContext {
        locations: &locations,
        neighborhoods: neighborhoods.as_ref(),
        smooth: args.smooth,
    };

    let reports: Vec<_> = args
        .input
        .par_iter()
        .filter_map(|path| {
            let result = load_route(path)
                .map_err(anyhow::Error::from)
                .and_then(|route| summarize_route(&route, &ctx));
            match result {
                Ok(report) => Some(report),
                Err(err) => {
                    log::error!("Skipping {}: {err:#}", path.display());
                    None
                }
            }
        })
        .collect();
    let failed = args.input.len() - reports.len();

    let mut issue_count = 0;
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for report in &reports {
        *seen.entry(report.summary.id.as_str()).or_insert(0) += 1;
        for issue in &report.issues {
            log::warn!("{}: {issue}", report.summary.id);
            issue_count += 1;
        }
    }
    for (id, count) in seen {
        if count > 1 {
            log::warn!("Route id {id} is used by {count} files");
            issue_count += 1;
        }
    }
    log::info!(
        "Measured {} routes, {failed} failed, {issue_count} issues",
        reports.len()
    );

    if let Some(path) = args.output {
        let mut summaries: Vec<_> = reports.into_iter().map(|x| x.summary).collect();
        sort_summaries(&mut summaries);
        serde_json::to_writer_pretty(BufWriter::new(File::create(&path)?), &summaries)?;
        log::info!("Wrote {}", path.display());
    }

    if args.strict && (issue_count > 0 || failed > 0) {
        bail!("{issue_count} issues and {failed} unreadable routes");
    }
    Ok(())
}
