use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse '{path}': {message}")]
    GpxParse { path: PathBuf, message: String },
    #[error("bogus route in '{path}': {message}")]
    GpxFormat { path: PathBuf, message: String },
    #[error("route path mismatch: {path} vs {id}.gpx")]
    RoguePath { path: PathBuf, id: String },
    #[error("bad metadata extensions in '{path}': {message}")]
    Extensions { path: PathBuf, message: String },
}
