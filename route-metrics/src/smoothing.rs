use route_model::TrackPoint;

use crate::metrics::haversine_meters;

pub const DEFAULT_SMOOTHING_WINDOW_METERS: f64 = 100.0;

/// Replace every elevation with the mean over the contiguous run of points within `window_m` of
/// it. The endpoints keep their raw values. Missing elevations count as 0m.
pub fn smooth_elevations(points: &[TrackPoint], window_m: f64) -> Vec<f64> {
    let raw: Vec<f64> = points
        .iter()
        .map(|pt| pt.elevation.unwrap_or(0.0))
        .collect();
    let mut smoothed = Vec::with_capacity(points.len());

    // The window is [start, end)
    let mut start = 0;
    let mut end = 0;
    let mut sum = 0.0;
    for i in 0..points.len() {
        while start + 1 < i && haversine_meters(&points[start], &points[i]) > window_m {
            sum -= raw[start];
            start += 1;
        }
        while end < points.len()
            && (end <= i || haversine_meters(&points[i], &points[end]) <= window_m)
        {
            sum += raw[end];
            end += 1;
        }
        smoothed.push(sum / (end - start) as f64);
    }

    if let (Some(first), Some(last)) = (raw.first(), raw.last()) {
        smoothed[0] = *first;
        let n = smoothed.len();
        smoothed[n - 1] = *last;
    }
    smoothed
}
