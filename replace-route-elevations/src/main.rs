use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;

use replace_route_elevations::{update_routes, CachedElevations, EpqsClient, EPQS_URL};

#[derive(Parser)]
struct Args {
    /// GPX route files to update
    #[arg(long, num_args = 1.., required = true)]
    input: Vec<PathBuf>,

    /// Where to write each updated route, in the same order as --input
    #[arg(long, num_args = 1.., required = true)]
    output: Vec<PathBuf>,

    /// Replace any existing elevation data
    #[arg(long)]
    overwrite: bool,

    /// Seconds to wait between elevation queries
    #[arg(long, default_value_t = 0.25)]
    wait: f64,

    /// File remembering elevations from earlier runs
    #[arg(long, default_value = "elevations.bin")]
    cache: PathBuf,

    /// Elevation Point Query Service endpoint
    #[arg(long, default_value = EPQS_URL)]
    epqs_url: String,
}

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;
    let args = Args::parse();
    if args.input.len() != args.output.len() {
        bail!("The number of inputs must match the number of outputs");
    }
    if !(args.wait >= 0.0) {
        bail!("--wait must be a non-negative number of seconds");
    }

    let client = EpqsClient::new(&args.epqs_url, Duration::from_secs_f64(args.wait))?;
    let mut source = CachedElevations::load(client, &args.cache)?;

    let result = update_routes(&args.input, &args.output, &mut source, args.overwrite);

    // Keep whatever was fetched, even if a query or write failed partway
    source.save()?;
    result
}
