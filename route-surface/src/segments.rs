use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde::Serialize;

use route_metrics::{haversine_meters, METERS_PER_MILE};
use route_model::{SurfaceShares, TrackPoint};

use crate::index::SurfaceIndex;
use crate::taxonomy::{stroke_color, Infrastructure, Material, WayClass};

/// One consecutive pair of route points and what it runs along.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceSegment {
    pub route_id: String,
    pub segment_index: usize,
    pub from: TrackPoint,
    pub to: TrackPoint,
    pub length_miles: f64,
    pub class: WayClass,
    pub way_name: Option<String>,
    pub way_highway: Option<String>,
    pub way_surface: Option<String>,
}

/// Share of a route's length in each class, as percentages rounded to one decimal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SurfacePercentages {
    pub paved: f64,
    pub unpaved: f64,
    pub street: f64,
    pub trail: f64,
    pub sidewalk: f64,
    pub stairs: f64,
}

impl SurfacePercentages {
    /// As fractions in `[0, 1]`, the way route files store them.
    pub fn to_shares(&self) -> SurfaceShares {
        SurfaceShares {
            paved: self.paved / 100.0,
            unpaved: self.unpaved / 100.0,
            street: self.street / 100.0,
            trail: self.trail / 100.0,
            sidewalk: self.sidewalk / 100.0,
            stairs: self.stairs / 100.0,
        }
    }
}

pub fn surface_segments(
    points: &[TrackPoint],
    index: &SurfaceIndex,
    route_id: &str,
) -> Vec<SurfaceSegment> {
    points
        .windows(2)
        .enumerate()
        .map(|(segment_index, pair)| {
            let (from, to) = (pair[0], pair[1]);
            let mut segment = SurfaceSegment {
                route_id: route_id.to_string(),
                segment_index,
                from,
                to,
                length_miles: haversine_meters(&from, &to) / METERS_PER_MILE,
                class: WayClass::UNKNOWN,
                way_name: None,
                way_highway: None,
                way_surface: None,
            };
            if let Some(attribution) = index.attribute_segment(from.coord(), to.coord()) {
                segment.class = attribution.class;
                segment.way_name = attribution.way.name.clone();
                segment.way_highway = Some(attribution.way.highway.clone());
                segment.way_surface = attribution.way.surface.clone();
            }
            segment
        })
        .collect()
}

pub fn surface_percentages(points: &[TrackPoint], index: &SurfaceIndex) -> SurfacePercentages {
    if index.is_empty() {
        return SurfacePercentages::default();
    }
    percentages_from_segments(&surface_segments(points, index, ""))
}

pub fn percentages_from_segments(segments: &[SurfaceSegment]) -> SurfacePercentages {
    let total: f64 = segments.iter().map(|s| s.length_miles).sum();
    if total == 0.0 {
        return SurfacePercentages::default();
    }

    let share = |keep: &dyn Fn(&WayClass) -> bool| {
        let length: f64 = segments
            .iter()
            .filter(|s| keep(&s.class))
            .map(|s| s.length_miles)
            .sum();
        (1000.0 * length / total).round() / 10.0
    };
    SurfacePercentages {
        paved: share(&|c: &WayClass| c.material == Material::Paved),
        unpaved: share(&|c: &WayClass| c.material == Material::Unpaved),
        street: share(&|c: &WayClass| c.infrastructure == Infrastructure::Street),
        trail: share(&|c: &WayClass| c.infrastructure == Infrastructure::Trail),
        sidewalk: share(&|c: &WayClass| c.infrastructure == Infrastructure::Sidewalk),
        stairs: share(&|c: &WayClass| c.stairs),
    }
}

pub fn segment_feature(segment: &SurfaceSegment) -> Feature {
    let mut f = Feature::from(Geometry::from(Value::LineString(vec![
        vec![segment.from.lon, segment.from.lat],
        vec![segment.to.lon, segment.to.lat],
    ])));
    f.set_property("route_id", segment.route_id.clone());
    f.set_property("segment_index", segment.segment_index);
    f.set_property("material", segment.class.material.as_str());
    f.set_property("infrastructure", segment.class.infrastructure.as_str());
    f.set_property(
        "length_miles",
        (segment.length_miles * 10_000.0).round() / 10_000.0,
    );
    f.set_property("way_name", segment.way_name.clone());
    f.set_property("way_highway", segment.way_highway.clone());
    f.set_property("way_surface", segment.way_surface.clone());
    f.set_property(
        "stroke",
        stroke_color(segment.class.material, segment.class.infrastructure),
    );
    f.set_property("stroke-width", 3);
    f.set_property("stroke-opacity", 0.8);
    f
}

pub fn segments_geojson(segments: &[SurfaceSegment]) -> FeatureCollection {
    segments.iter().map(segment_feature).collect()
}
