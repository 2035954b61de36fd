use std::fs;
use std::path::{Path, PathBuf};

use crate::extensions::{parse_extensions, Extensions};
use crate::{Route, RouteError, RouteType, SurfaceShares, TrackPoint};

const SURFACE_SHARE_KEYS: [&str; 6] = [
    "surface_paved",
    "surface_unpaved",
    "surface_street",
    "surface_trail",
    "surface_sidewalk",
    "stairs",
];

/// Read a route GPX file. The file must hold exactly one `<rte>`, or exactly one track with
/// exactly one segment.
pub fn load_route(path: &Path) -> Result<Route, RouteError> {
    let text = fs::read_to_string(path).map_err(|source| RouteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    route_from_gpx_str(&text, path)
}

pub fn load_routes(paths: &[PathBuf]) -> Result<Vec<Route>, RouteError> {
    paths.iter().map(|path| load_route(path)).collect()
}

/// Like `load_route`, for GPX text already in memory. `path` supplies the route id.
pub fn route_from_gpx_str(text: &str, path: &Path) -> Result<Route, RouteError> {
    let gpx = gpx::read(text.as_bytes()).map_err(|err| RouteError::GpxParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let ext = parse_extensions(text).map_err(|err| RouteError::Extensions {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let format_err = |message: &str| RouteError::GpxFormat {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let (waypoints, description) = if gpx.routes.len() == 1 {
        (&gpx.routes[0].points, gpx.routes[0].description.clone())
    } else if gpx.tracks.len() == 1 && gpx.tracks[0].segments.len() == 1 {
        (
            &gpx.tracks[0].segments[0].points,
            gpx.tracks[0].description.clone(),
        )
    } else {
        return Err(format_err("bogus number of tracks"));
    };

    let points: Vec<TrackPoint> = waypoints
        .iter()
        .map(|wpt| {
            let pt = wpt.point();
            TrackPoint::new(pt.y(), pt.x(), wpt.elevation)
        })
        .collect();

    let id = path
        .file_stem()
        .and_then(|x| x.to_str())
        .ok_or_else(|| format_err("no file name to take the route id from"))?
        .to_string();

    let name = match ext.get("name") {
        Some(name) => name.to_string(),
        None => description
            .as_deref()
            .and_then(name_from_description)
            .ok_or_else(|| format_err("no name extension or track description"))?,
    };
    let distance_mi = match ext.get_f64("distance") {
        Some(dist) => dist,
        None => description
            .as_deref()
            .and_then(distance_from_description)
            .ok_or_else(|| format_err("no distance extension or '(<x> mi)' in description"))?,
    };

    let route_type = match ext.get("type") {
        Some(raw) => match raw.parse() {
            Ok(route_type) => Some(route_type),
            Err(err) => {
                log::warn!("{id}: {err}");
                None
            }
        },
        None => RouteType::from_id(&id),
    };

    Ok(Route {
        name,
        distance_mi,
        ascent_m: ext.get_f64("ascent"),
        descent_m: ext.get_f64("descent"),
        route_type,
        surface: owned(&ext, "surface"),
        map: owned(&ext, "map"),
        start: owned(&ext, "start"),
        end: owned(&ext, "end"),
        deprecated: ext.get("deprecated") == Some("true"),
        notes: owned(&ext, "notes"),
        last_updated: owned(&ext, "last_updated"),
        surface_shares: surface_shares(&ext),
        changelog: ext.changelog,
        points,
        path: path.to_path_buf(),
        id,
    })
}

fn owned(ext: &Extensions, key: &str) -> Option<String> {
    ext.get(key).map(|x| x.to_string())
}

fn surface_shares(ext: &Extensions) -> Option<SurfaceShares> {
    if SURFACE_SHARE_KEYS.iter().all(|key| ext.get(key).is_none()) {
        return None;
    }
    let share = |key: &str| ext.get_f64(key).unwrap_or(0.0);
    Some(SurfaceShares {
        paved: share("surface_paved"),
        unpaved: share("surface_unpaved"),
        street: share("surface_street"),
        trail: share("surface_trail"),
        sidewalk: share("surface_sidewalk"),
        stairs: share("stairs"),
    })
}

// Descriptions look like "Green Lake Loop (2.8 mi)"
fn name_from_description(desc: &str) -> Option<String> {
    let name = desc.split('(').next()?.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn distance_from_description(desc: &str) -> Option<f64> {
    let inside = desc.split('(').nth(1)?;
    let (dist, _) = inside.split_once("mi)")?;
    dist.trim().parse().ok()
}
