use std::fmt;

use route_model::{is_loop_id, Location, Route, RouteType, TrackPoint};

use crate::locations::nearest_location;
use crate::metrics::RouteMetrics;

const DISTANCE_TOLERANCE_MILES: f64 = 0.1;
const ELEVATION_TOLERANCE_METERS: f64 = 30.0;
/// Route endpoints farther than this from every known location are suspicious.
const LOCATION_TOLERANCE_MILES: f64 = 0.15;

#[derive(Clone, Debug, PartialEq)]
pub enum RouteIssue {
    DistanceMismatch { declared: f64, computed: f64 },
    AscentMismatch { declared: f64, computed: f64 },
    DescentMismatch { declared: f64, computed: f64 },
    DistantStart { miles: f64 },
    DistantEnd { miles: f64 },
    StartMismatch { declared: String, nearest: String },
    EndMismatch { declared: String, nearest: String },
    UnknownType,
    LoopId,
    LoopName,
    OutAndBackId,
    OutAndBackName,
    EndpointsMustMatch(RouteType),
    EndpointsMustDiffer,
    InvalidStart(Option<String>),
    InvalidEnd(Option<String>),
    InvalidDistance(f64),
    InvalidAscent(Option<f64>),
    InvalidDescent(Option<f64>),
}

impl fmt::Display for RouteIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteIssue::DistanceMismatch { declared, computed } => {
                write!(f, "distance mismatch: {computed:.1} vs {declared:.1}")
            }
            RouteIssue::AscentMismatch { declared, computed } => {
                write!(f, "ascent mismatch: {computed:.0} vs {declared:.0}")
            }
            RouteIssue::DescentMismatch { declared, computed } => {
                write!(f, "descent mismatch: {computed:.0} vs {declared:.0}")
            }
            RouteIssue::DistantStart { miles } => {
                write!(f, "distant from start loc: {miles:.2}")
            }
            RouteIssue::DistantEnd { miles } => write!(f, "distant from end loc: {miles:.2}"),
            RouteIssue::StartMismatch { declared, nearest } => {
                write!(f, "start mismatch: {declared} vs {nearest}")
            }
            RouteIssue::EndMismatch { declared, nearest } => {
                write!(f, "end mismatch: {declared} vs {nearest}")
            }
            RouteIssue::UnknownType => write!(f, "unknown route type"),
            RouteIssue::LoopId => write!(f, "Loop route ids should end with '-loop' or '-loop-NN'"),
            RouteIssue::LoopName => {
                write!(f, "Loop route name should end with ' Loop' or ' Loop NN'")
            }
            RouteIssue::OutAndBackId => write!(f, "OB route ids should end with '-ob'"),
            RouteIssue::OutAndBackName => write!(f, "OB route name should start with 'OB: '"),
            RouteIssue::EndpointsMustMatch(route_type) => {
                write!(f, "start and end must match for a {route_type} route")
            }
            RouteIssue::EndpointsMustDiffer => write!(f, "start and end must differ for P2P route"),
            RouteIssue::InvalidStart(start) => {
                write!(f, "invalid start '{}'", start.as_deref().unwrap_or(""))
            }
            RouteIssue::InvalidEnd(end) => {
                write!(f, "invalid end '{}'", end.as_deref().unwrap_or(""))
            }
            RouteIssue::InvalidDistance(dist) => write!(f, "invalid distance '{dist}'"),
            RouteIssue::InvalidAscent(ascent) => match ascent {
                Some(x) => write!(f, "invalid elevation up '{x}'"),
                None => write!(f, "invalid elevation up ''"),
            },
            RouteIssue::InvalidDescent(descent) => match descent {
                Some(x) => write!(f, "invalid elevation down '{x}'"),
                None => write!(f, "invalid elevation down ''"),
            },
        }
    }
}

/// Compare what the route declares against what its points say, then check the naming and
/// endpoint conventions of the route with its blanks filled by `fill_blanks`.
pub fn check_route(
    route: &Route,
    computed: &RouteMetrics,
    locations: &[Location],
) -> Vec<RouteIssue> {
    let mut issues = check_measurements(route, computed, locations);
    let mut filled = route.clone();
    fill_blanks(&mut filled, computed, locations);
    issues.extend(check_conventions(&filled, locations));
    issues
}

/// Only the declared-vs-computed comparisons: distance, elevation and endpoint locations.
pub fn check_measurements(
    route: &Route,
    computed: &RouteMetrics,
    locations: &[Location],
) -> Vec<RouteIssue> {
    let mut issues = Vec::new();

    if route.distance_mi != 0.0
        && (computed.distance_mi - route.distance_mi).abs() > DISTANCE_TOLERANCE_MILES
    {
        issues.push(RouteIssue::DistanceMismatch {
            declared: route.distance_mi,
            computed: computed.distance_mi,
        });
    }
    if let Some(declared) = route.ascent_m.filter(|x| *x != 0.0) {
        if (computed.ascent_m - declared).abs() > ELEVATION_TOLERANCE_METERS {
            issues.push(RouteIssue::AscentMismatch {
                declared,
                computed: computed.ascent_m,
            });
        }
    }
    if let Some(declared) = route.descent_m.filter(|x| *x != 0.0) {
        if (computed.descent_m - declared).abs() > ELEVATION_TOLERANCE_METERS {
            issues.push(RouteIssue::DescentMismatch {
                declared,
                computed: computed.descent_m,
            });
        }
    }

    let nearest_start = route
        .points
        .first()
        .and_then(|pt| nearest_location(locations, pt));
    let nearest_end = route
        .points
        .last()
        .and_then(|pt| nearest_location(locations, pt));
    if let Some((_, miles)) = nearest_start {
        if miles > LOCATION_TOLERANCE_MILES {
            issues.push(RouteIssue::DistantStart { miles });
        }
    }
    if let Some((_, miles)) = nearest_end {
        if miles > LOCATION_TOLERANCE_MILES {
            issues.push(RouteIssue::DistantEnd { miles });
        }
    }
    if let (Some(declared), Some((loc, _))) = (&route.start, nearest_start) {
        if *declared != loc.id {
            issues.push(RouteIssue::StartMismatch {
                declared: declared.clone(),
                nearest: loc.id.clone(),
            });
        }
    }
    if let (Some(declared), Some((loc, _))) = (&route.end, nearest_end) {
        if *declared != loc.id {
            issues.push(RouteIssue::EndMismatch {
                declared: declared.clone(),
                nearest: loc.id.clone(),
            });
        }
    }
    issues
}

fn check_conventions(route: &Route, locations: &[Location]) -> Vec<RouteIssue> {
    let mut issues = Vec::new();

    match route.route_type {
        None => issues.push(RouteIssue::UnknownType),
        Some(RouteType::Loop) => {
            if !is_loop_id(&route.id) {
                issues.push(RouteIssue::LoopId);
            }
            if !is_loop_name(&route.name) {
                issues.push(RouteIssue::LoopName);
            }
        }
        Some(RouteType::OutAndBack) => {
            if !route.id.ends_with("-ob") {
                issues.push(RouteIssue::OutAndBackId);
            }
            if !route.name.starts_with("OB: ") {
                issues.push(RouteIssue::OutAndBackName);
            }
        }
        Some(RouteType::PointToPoint) => {}
    }

    let (start, end) = (&route.start, &route.end);
    match route.route_type {
        Some(route_type @ (RouteType::Loop | RouteType::OutAndBack)) if start != end => {
            issues.push(RouteIssue::EndpointsMustMatch(route_type));
        }
        Some(RouteType::PointToPoint) if start == end => {
            issues.push(RouteIssue::EndpointsMustDiffer);
        }
        _ => {}
    }

    let known = |id: &Option<String>| {
        id.as_ref()
            .map_or(false, |id| locations.iter().any(|loc| loc.id == *id))
    };
    if !known(start) {
        issues.push(RouteIssue::InvalidStart(start.clone()));
    }
    if !known(end) {
        issues.push(RouteIssue::InvalidEnd(end.clone()));
    }

    if !(route.distance_mi > 0.0) {
        issues.push(RouteIssue::InvalidDistance(route.distance_mi));
    }
    if !route.ascent_m.map_or(false, |x| x > 0.0) {
        issues.push(RouteIssue::InvalidAscent(route.ascent_m));
    }
    if !route.descent_m.map_or(false, |x| x >= 0.0) {
        issues.push(RouteIssue::InvalidDescent(route.descent_m));
    }

    issues
}

/// Loop names end with " Loop" or " Loop NN".
fn is_loop_name(name: &str) -> bool {
    if name.ends_with(" Loop") {
        return true;
    }
    match name.rsplit_once(" Loop ") {
        Some((_, suffix)) => suffix.len() == 2 && suffix.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Set a missing start or end to the id of the nearest known location.
pub fn fill_endpoints(route: &mut Route, locations: &[Location]) {
    if route.start.is_none() {
        route.start = nearest_id(locations, route.points.first());
    }
    if route.end.is_none() {
        route.end = nearest_id(locations, route.points.last());
    }
}

/// Fill a blank (missing or zero) distance, ascent or descent and a missing type from the
/// computed metrics, and missing endpoints from the nearest locations.
pub fn fill_blanks(route: &mut Route, computed: &RouteMetrics, locations: &[Location]) {
    if route.distance_mi == 0.0 {
        route.distance_mi = computed.distance_mi;
    }
    if route.ascent_m.map_or(true, |x| x == 0.0) {
        route.ascent_m = Some(computed.ascent_m);
    }
    if route.descent_m.map_or(true, |x| x == 0.0) {
        route.descent_m = Some(computed.descent_m);
    }
    if route.route_type.is_none() {
        route.route_type = Some(computed.route_type);
    }
    fill_endpoints(route, locations);
}

fn nearest_id(locations: &[Location], pt: Option<&TrackPoint>) -> Option<String> {
    pt.and_then(|pt| nearest_location(locations, pt))
        .map(|(loc, _)| loc.id.clone())
}
