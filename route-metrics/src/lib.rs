//! Distance, elevation and shape metrics for GPS routes, plus the checks that compare them against
//! what a route file declares.

mod checks;
mod locations;
mod metrics;
mod neighborhoods;
mod report;
mod shape;
mod smoothing;

pub use checks::{check_measurements, check_route, fill_blanks, fill_endpoints, RouteIssue};
pub use locations::nearest_location;
pub use metrics::{compute_route_metrics, haversine_meters, RouteMetrics, METERS_PER_MILE};
pub use neighborhoods::{Neighborhood, NeighborhoodIndex, RouteNeighborhoods};
pub use report::{sort_summaries, summarize_route, RouteReport, RouteSummary, SummaryContext};
pub use shape::{
    classify_shape, out_and_backness, OUT_AND_BACK_RATIO, OUT_AND_BACK_THRESHOLD_METERS,
    SAME_PLACE_THRESHOLD_MILES,
};
pub use smoothing::{smooth_elevations, DEFAULT_SMOOTHING_WINDOW_METERS};
