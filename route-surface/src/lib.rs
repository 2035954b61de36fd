//! Attributes each stretch of a route to the nearest OSM way, then summarizes the route by
//! material (paved or not) and by infrastructure (street, trail, sidewalk, stairs).

mod gpx_tags;
mod index;
mod segments;
mod taxonomy;
#[cfg(test)]
mod tests;

pub use gpx_tags::add_surface_tags;
pub use index::{web_mercator, Attribution, DistanceMetric, LocalProjection, SurfaceIndex};
pub use segments::{
    percentages_from_segments, segment_feature, segments_geojson, surface_percentages,
    surface_segments, SurfacePercentages, SurfaceSegment,
};
pub use taxonomy::{
    classify_way, infrastructure, is_stairs, material_from_highway, stroke_color,
    surface_material, Infrastructure, Material, WayClass,
};

/// Ways farther than this from a route segment are ignored, in Web Mercator meters by default.
pub const DEFAULT_BUFFER_METERS: f64 = 15.0;
