use std::collections::BTreeSet;

use anyhow::{bail, Context, Result};
use geo::{BoundingRect, Contains, MultiPolygon, Point, Polygon, Rect};
use geojson::GeoJson;
use serde::Serialize;

use route_model::{RouteType, TrackPoint};

pub struct Neighborhood {
    pub name: String,
    pub coarse_name: String,
    pub shape: MultiPolygon,
    bbox: Rect,
}

impl Neighborhood {
    pub fn contains(&self, pt: Point) -> bool {
        // Cheap inclusive bbox test first
        let (min, max) = (self.bbox.min(), self.bbox.max());
        min.x <= pt.x()
            && pt.x() <= max.x
            && min.y <= pt.y()
            && pt.y() <= max.y
            && self.shape.contains(&pt)
    }
}

pub struct NeighborhoodIndex {
    neighborhoods: Vec<Neighborhood>,
    outside_label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteNeighborhoods {
    pub start: String,
    /// Unknown for routes with no type
    pub end: Option<String>,
    pub neighborhoods: Vec<String>,
    pub coarse_neighborhoods: Vec<String>,
}

impl NeighborhoodIndex {
    /// Parses a FeatureCollection of Polygon and MultiPolygon features. Every feature names its
    /// neighborhood in the `fine_key` property and the larger district in `coarse_key`. Only
    /// exterior rings are kept.
    pub fn from_geojson(input: &str, fine_key: &str, coarse_key: &str) -> Result<Self> {
        let gj: GeoJson = input.parse()?;
        let GeoJson::FeatureCollection(collection) = gj else {
            bail!("neighborhoods must be a FeatureCollection");
        };

        let mut neighborhoods = Vec::new();
        for (idx, feature) in collection.features.into_iter().enumerate() {
            let name = string_property(&feature, fine_key)
                .with_context(|| format!("neighborhood feature {idx}"))?;
            let coarse_name = string_property(&feature, coarse_key)
                .with_context(|| format!("neighborhood feature {idx}"))?;
            let Some(geometry) = feature.geometry else {
                log::warn!("Skipping neighborhood {name} with no geometry");
                continue;
            };
            let polygons = match geo::Geometry::try_from(geometry.value)? {
                geo::Geometry::Polygon(polygon) => vec![polygon],
                geo::Geometry::MultiPolygon(multi) => multi.0,
                _ => {
                    log::warn!("Skipping neighborhood {name}, which isn't a polygon");
                    continue;
                }
            };
            // Holes don't carve anything out of a neighborhood
            let shape = MultiPolygon::new(
                polygons
                    .into_iter()
                    .map(|polygon| Polygon::new(polygon.exterior().clone(), Vec::new()))
                    .collect(),
            );
            let Some(bbox) = shape.bounding_rect() else {
                continue;
            };
            neighborhoods.push(Neighborhood {
                name,
                coarse_name,
                shape,
                bbox,
            });
        }

        log::info!("Loaded {} neighborhoods", neighborhoods.len());
        Ok(Self {
            neighborhoods,
            outside_label: "non-Seattle".to_string(),
        })
    }

    /// The label used when a route touches no neighborhood at all.
    pub fn with_outside_label(mut self, label: &str) -> Self {
        self.outside_label = label.to_string();
        self
    }

    pub fn neighborhoods(&self) -> &[Neighborhood] {
        &self.neighborhoods
    }

    /// Neighborhoods containing the point, in file order.
    pub fn containing(&self, pt: Point) -> impl Iterator<Item = &Neighborhood> {
        self.neighborhoods.iter().filter(move |n| n.contains(pt))
    }

    pub fn route_neighborhoods(
        &self,
        points: &[TrackPoint],
        route_type: Option<RouteType>,
    ) -> RouteNeighborhoods {
        let mut fine = Vec::new();
        let mut coarse = Vec::new();
        for pt in points {
            for n in self.containing(pt.point()) {
                fine.push(n.name.clone());
                coarse.push(n.coarse_name.clone());
            }
        }
        if fine.is_empty() {
            fine.push(self.outside_label.clone());
            coarse.push(self.outside_label.clone());
        }

        let start = fine[0].clone();
        let end = match route_type {
            Some(RouteType::Loop) | Some(RouteType::OutAndBack) => Some(start.clone()),
            Some(RouteType::PointToPoint) => fine.last().cloned(),
            None => None,
        };
        RouteNeighborhoods {
            start,
            end,
            neighborhoods: sorted_unique(fine),
            coarse_neighborhoods: sorted_unique(coarse),
        }
    }
}

fn string_property(feature: &geojson::Feature, key: &str) -> Result<String> {
    match feature.property(key).and_then(|x| x.as_str()) {
        Some(value) => Ok(value.to_string()),
        None => bail!("missing string property {key}"),
    }
}

fn sorted_unique(names: Vec<String>) -> Vec<String> {
    names.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}
