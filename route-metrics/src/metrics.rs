use anyhow::{bail, Result};
use geo::{Distance, Haversine};
use serde::Serialize;

use route_model::{RouteType, TrackPoint};

use crate::shape::classify_shape;

pub const METERS_PER_MILE: f64 = 1609.344;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteMetrics {
    pub distance_mi: f64,
    pub ascent_m: f64,
    pub descent_m: f64,
    #[serde(rename = "type")]
    pub route_type: RouteType,
    #[serde(rename = "out-and-backness")]
    pub out_and_backness: f64,
}

pub fn haversine_meters(a: &TrackPoint, b: &TrackPoint) -> f64 {
    Haversine.distance(a.point(), b.point())
}

/// Plain sums over consecutive points, no smoothing. A missing elevation counts as 0m.
pub fn compute_route_metrics(points: &[TrackPoint]) -> Result<RouteMetrics> {
    if points.is_empty() {
        bail!("route has no points");
    }

    let distance_m: f64 = points
        .windows(2)
        .map(|pair| haversine_meters(&pair[0], &pair[1]))
        .sum();

    let elevations: Vec<f64> = points
        .iter()
        .map(|pt| pt.elevation.unwrap_or(0.0))
        .collect();
    let mut ascent_m = 0.0;
    let mut descent_m = 0.0;
    for pair in elevations.windows(2) {
        let delta = pair[1] - pair[0];
        if delta > 0.0 {
            ascent_m += delta;
        } else {
            descent_m -= delta;
        }
    }

    let (route_type, out_and_backness) = classify_shape(points);
    Ok(RouteMetrics {
        distance_mi: distance_m / METERS_PER_MILE,
        ascent_m,
        descent_m,
        route_type,
        out_and_backness,
    })
}
