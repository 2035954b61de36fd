use route_model::{Location, TrackPoint};

use crate::metrics::{haversine_meters, METERS_PER_MILE};

/// The closest known location to `pt` and its distance in miles.
pub fn nearest_location<'a>(
    locations: &'a [Location],
    pt: &TrackPoint,
) -> Option<(&'a Location, f64)> {
    locations
        .iter()
        .map(|loc| {
            let there = TrackPoint::new(loc.lat, loc.lon, None);
            (loc, haversine_meters(pt, &there) / METERS_PER_MILE)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
