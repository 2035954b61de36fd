use anyhow::Result;
use serde::Serialize;

use route_model::{Change, Location, Route, RouteType, TrackPoint};

use crate::checks::{check_route, fill_blanks, RouteIssue};
use crate::metrics::{compute_route_metrics, RouteMetrics};
use crate::neighborhoods::NeighborhoodIndex;
use crate::smoothing::{smooth_elevations, DEFAULT_SMOOTHING_WINDOW_METERS};

/// Everything shared across routes while summarizing a batch.
pub struct SummaryContext<'a> {
    pub locations: &'a [Location],
    pub neighborhoods: Option<&'a NeighborhoodIndex>,
    /// Compute ascent and descent from smoothed elevations
    pub smooth: bool,
}

/// One row of the route table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteSummary {
    pub id: String,
    pub name: String,
    pub start: Option<String>,
    pub distance_mi: f64,
    pub ascent_m: f64,
    pub descent_m: f64,
    pub end: Option<String>,
    #[serde(rename = "type")]
    pub route_type: RouteType,
    pub surface: Option<String>,
    pub map: Option<String>,
    pub deprecated: bool,
    pub neighborhoods: Vec<String>,
    pub coarse_neighborhoods: Vec<String>,
    pub start_neighborhood: Option<String>,
    pub end_neighborhood: Option<String>,
    pub out_and_backness: f64,
    pub last_updated: Option<String>,
    pub notes: Option<String>,
    pub changelog: Vec<Change>,
    pub gpx: String,
    pub geojson: String,
}

pub struct RouteReport {
    pub summary: RouteSummary,
    pub computed: RouteMetrics,
    pub issues: Vec<RouteIssue>,
}

pub fn summarize_route(route: &Route, ctx: &SummaryContext) -> Result<RouteReport> {
    let mut computed = compute_route_metrics(&route.points)?;
    if ctx.smooth {
        let smoothed: Vec<TrackPoint> = route
            .points
            .iter()
            .zip(smooth_elevations(&route.points, DEFAULT_SMOOTHING_WINDOW_METERS))
            .map(|(pt, elevation)| TrackPoint::new(pt.lat, pt.lon, Some(elevation)))
            .collect();
        let smoothed = compute_route_metrics(&smoothed)?;
        computed.ascent_m = smoothed.ascent_m;
        computed.descent_m = smoothed.descent_m;
    }
    let issues = check_route(route, &computed, ctx.locations);

    // The row shows the same filled-in values the checks judged
    let mut filled = route.clone();
    fill_blanks(&mut filled, &computed, ctx.locations);
    let route_type = filled.route_type.unwrap_or(computed.route_type);

    let mut summary = RouteSummary {
        id: filled.id,
        name: filled.name,
        start: filled.start,
        distance_mi: round_to(filled.distance_mi, 1),
        ascent_m: round_to(filled.ascent_m.unwrap_or(computed.ascent_m), 2),
        descent_m: round_to(filled.descent_m.unwrap_or(computed.descent_m), 2),
        end: filled.end,
        route_type,
        surface: filled.surface,
        map: filled.map,
        deprecated: filled.deprecated,
        neighborhoods: Vec::new(),
        coarse_neighborhoods: Vec::new(),
        start_neighborhood: None,
        end_neighborhood: None,
        out_and_backness: round_to(computed.out_and_backness, 3),
        last_updated: filled.last_updated,
        notes: filled.notes,
        changelog: filled.changelog,
        gpx: format!("/routes/gpx/{}.gpx", route.id),
        geojson: format!("/routes/geojson/{}.geojson", route.id),
    };
    if let Some(index) = ctx.neighborhoods {
        let hoods = index.route_neighborhoods(&route.points, Some(route_type));
        summary.start_neighborhood = Some(hoods.start);
        summary.end_neighborhood = hoods.end;
        summary.neighborhoods = hoods.neighborhoods;
        summary.coarse_neighborhoods = hoods.coarse_neighborhoods;
    }

    Ok(RouteReport {
        summary,
        computed,
        issues,
    })
}

/// Order by start (case-insensitive), then distance, end, type and id.
pub fn sort_summaries(summaries: &mut [RouteSummary]) {
    summaries.sort_by(|a, b| {
        let a_start = a.start.as_deref().unwrap_or("").to_lowercase();
        let b_start = b.start.as_deref().unwrap_or("").to_lowercase();
        a_start
            .cmp(&b_start)
            .then_with(|| a.distance_mi.total_cmp(&b.distance_mi))
            .then_with(|| a.end.cmp(&b.end))
            .then_with(|| a.route_type.cmp(&b.route_type))
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn round_to(x: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (x * scale).round() / scale
}
