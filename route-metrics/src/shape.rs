use route_model::{RouteType, TrackPoint};

use crate::metrics::{haversine_meters, METERS_PER_MILE};

/// A second-half point counts as "coming back" if some first-half point is closer than this.
pub const OUT_AND_BACK_THRESHOLD_METERS: f64 = 100.0;
/// Start and end closer than this make a closed route.
pub const SAME_PLACE_THRESHOLD_MILES: f64 = 0.1;
/// Closed routes above this out-and-back-ness are out-and-backs.
pub const OUT_AND_BACK_RATIO: f64 = 0.6;

/// Returns the route type and the out-and-back-ness it was decided from.
pub fn classify_shape(points: &[TrackPoint]) -> (RouteType, f64) {
    let ratio = out_and_backness(points);
    let start_end_same = match (points.first(), points.last()) {
        (Some(first), Some(last)) => {
            haversine_meters(first, last) / METERS_PER_MILE < SAME_PLACE_THRESHOLD_MILES
        }
        _ => false,
    };

    let route_type = if ratio > OUT_AND_BACK_RATIO && start_end_same {
        RouteType::OutAndBack
    } else if start_end_same {
        RouteType::Loop
    } else {
        RouteType::PointToPoint
    };
    (route_type, ratio)
}

/// The fraction of points after the distance midpoint that pass near some point before it. An
/// out-and-back retraces itself, so this approaches 1; a loop stays low.
pub fn out_and_backness(points: &[TrackPoint]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }

    let mut cumulative = Vec::with_capacity(points.len());
    cumulative.push(0.0);
    for pair in points.windows(2) {
        let so_far = cumulative[cumulative.len() - 1];
        cumulative.push(so_far + haversine_meters(&pair[0], &pair[1]));
    }
    let half = cumulative[cumulative.len() - 1] / 2.0;

    // The first index closest to half the total distance
    let midpoint = (0..cumulative.len())
        .min_by(|a, b| {
            (cumulative[*a] - half)
                .abs()
                .total_cmp(&(cumulative[*b] - half).abs())
        })
        .unwrap_or(0);

    let (first_half, second_half) = points.split_at(midpoint + 1);
    if second_half.is_empty() {
        return 0.0;
    }

    let nearby = second_half
        .iter()
        .filter(|pt2| {
            first_half
                .iter()
                .any(|pt1| haversine_meters(pt1, pt2) < OUT_AND_BACK_THRESHOLD_METERS)
        })
        .count();
    nearby as f64 / second_half.len() as f64
}
