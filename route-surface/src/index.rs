use geo::{BoundingRect, Coord, Distance, Euclidean, Line, LineString, Point};
use rstar::primitives::{GeomWithData, Line as IndexedLine};
use rstar::{RTree, AABB};

use route_model::{Way, WayNetwork};

use crate::taxonomy::{classify_way, WayClass};

const EARTH_RADIUS_METERS: f64 = 6_371_008.8;
/// The sphere EPSG:3857 is defined on
const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

/// How buffers and the nearest way are measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistanceMetric {
    /// Buffer in Web Mercator (EPSG:3857) units, which shrink to about 0.67 true meters at
    /// Seattle's latitude. The nearest way is judged by planar distance in degrees.
    #[default]
    WebMercator,
    /// Buffer and nearest way both in true meters, from a local equirectangular projection.
    LocalMeters,
}

/// Spherical Web Mercator, x = longitude and y = latitude in.
pub fn web_mercator(pt: Coord) -> Coord {
    let lat = pt.y.to_radians();
    Coord {
        x: WEB_MERCATOR_RADIUS * pt.x.to_radians(),
        y: WEB_MERCATOR_RADIUS * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln(),
    }
}

/// Equirectangular projection around a fixed origin, giving planar coordinates in meters. Good
/// enough over the span of a city.
#[derive(Clone, Copy, Debug)]
pub struct LocalProjection {
    origin: Coord,
    meters_per_degree_x: f64,
    meters_per_degree_y: f64,
}

impl LocalProjection {
    pub fn new(origin: Coord) -> Self {
        let meters_per_degree_y = EARTH_RADIUS_METERS.to_radians();
        Self {
            origin,
            meters_per_degree_x: meters_per_degree_y * origin.y.to_radians().cos(),
            meters_per_degree_y,
        }
    }

    /// x = longitude, y = latitude in, meters out
    pub fn project(&self, pt: Coord) -> Coord {
        Coord {
            x: (pt.x - self.origin.x) * self.meters_per_degree_x,
            y: (pt.y - self.origin.y) * self.meters_per_degree_y,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Projection {
    WebMercator,
    Local(LocalProjection),
}

impl Projection {
    fn project(&self, pt: Coord) -> Coord {
        match self {
            Projection::WebMercator => web_mercator(pt),
            Projection::Local(local) => local.project(pt),
        }
    }
}

/// Ways worth attributing a route segment to, with a spatial index over the pieces of each way.
pub struct SurfaceIndex {
    ways: Vec<IndexedWay>,
    pieces: RTree<GeomWithData<IndexedLine<[f64; 2]>, usize>>,
    projection: Projection,
    metric: DistanceMetric,
    buffer_meters: f64,
}

struct IndexedWay {
    way: Way,
    class: WayClass,
    projected: LineString,
}

/// The way a route segment runs along.
pub struct Attribution<'a> {
    pub way: &'a Way,
    pub class: WayClass,
}

impl SurfaceIndex {
    pub fn new(network: &WayNetwork, buffer_meters: f64) -> Self {
        Self::with_metric(network, buffer_meters, DistanceMetric::default())
    }

    /// `buffer_meters` is in the units `metric` measures buffers in.
    pub fn with_metric(
        network: &WayNetwork,
        buffer_meters: f64,
        metric: DistanceMetric,
    ) -> Self {
        let projection = match metric {
            DistanceMetric::WebMercator => Projection::WebMercator,
            DistanceMetric::LocalMeters => {
                Projection::Local(LocalProjection::new(network_center(network)))
            }
        };

        let mut ways = Vec::new();
        let mut pieces = Vec::new();
        for way in &network.ways {
            let projected: LineString = way
                .geometry
                .coords()
                .map(|pt| projection.project(*pt))
                .collect();
            let idx = ways.len();
            for line in projected.lines() {
                pieces.push(GeomWithData::new(
                    IndexedLine::new([line.start.x, line.start.y], [line.end.x, line.end.y]),
                    idx,
                ));
            }
            ways.push(IndexedWay {
                class: classify_way(&way.highway, way.surface.as_deref()),
                way: way.clone(),
                projected,
            });
        }
        log::info!(
            "Indexed {} ways, {} pieces total",
            ways.len(),
            pieces.len()
        );

        Self {
            ways,
            pieces: RTree::bulk_load(pieces),
            projection,
            metric,
            buffer_meters,
        }
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn is_empty(&self) -> bool {
        self.ways.is_empty()
    }

    pub fn buffer_meters(&self) -> f64 {
        self.buffer_meters
    }

    /// Indices of every way passing within the buffer of the segment, in network order.
    pub fn nearby_ways(&self, from: Coord, to: Coord) -> Vec<usize> {
        let segment = Line::new(self.projection.project(from), self.projection.project(to));
        let buffer = self.buffer_meters;
        let envelope = AABB::from_corners(
            [
                segment.start.x.min(segment.end.x) - buffer,
                segment.start.y.min(segment.end.y) - buffer,
            ],
            [
                segment.start.x.max(segment.end.x) + buffer,
                segment.start.y.max(segment.end.y) + buffer,
            ],
        );

        let mut nearby: Vec<usize> = self
            .pieces
            .locate_in_envelope_intersecting(&envelope)
            .filter(|piece| {
                let [x1, y1] = piece.geom().from;
                let [x2, y2] = piece.geom().to;
                let line = Line::new(Coord { x: x1, y: y1 }, Coord { x: x2, y: y2 });
                Euclidean.distance(&segment, &line) <= buffer
            })
            .map(|piece| piece.data)
            .collect();
        nearby.sort();
        nearby.dedup();
        nearby
    }

    /// The nearby way closest to the segment's midpoint. Ties go to the earlier way.
    pub fn attribute_segment(&self, from: Coord, to: Coord) -> Option<Attribution<'_>> {
        let midpoint = Coord {
            x: (from.x + to.x) / 2.0,
            y: (from.y + to.y) / 2.0,
        };
        let projected_midpoint = Point::from(self.projection.project(midpoint));

        let mut best: Option<(usize, f64)> = None;
        for idx in self.nearby_ways(from, to) {
            let indexed = &self.ways[idx];
            let dist = match self.metric {
                DistanceMetric::WebMercator => {
                    Euclidean.distance(&Point::from(midpoint), &indexed.way.geometry)
                }
                DistanceMetric::LocalMeters => {
                    Euclidean.distance(&projected_midpoint, &indexed.projected)
                }
            };
            if best.map_or(true, |(_, best_dist)| dist < best_dist) {
                best = Some((idx, dist));
            }
        }

        let indexed = &self.ways[best?.0];
        Some(Attribution {
            way: &indexed.way,
            class: indexed.class,
        })
    }
}

fn network_center(network: &WayNetwork) -> Coord {
    network
        .ways
        .iter()
        .filter_map(|way| way.geometry.bounding_rect())
        .reduce(|a, b| {
            geo::Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                },
            )
        })
        .map(|bbox| bbox.center())
        .unwrap_or(Coord { x: 0.0, y: 0.0 })
}
