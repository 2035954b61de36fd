use std::path::Path;

use geo::{Coord, LineString};
use route_model::{route_from_gpx_str, TrackPoint, Way, WayNetwork};

use super::*;

fn way(
    id: i64,
    highway: &str,
    surface: Option<&str>,
    name: Option<&str>,
    pts: &[(f64, f64)],
) -> Way {
    Way {
        id,
        highway: highway.to_string(),
        surface: surface.map(|x| x.to_string()),
        name: name.map(|x| x.to_string()),
        geometry: LineString::new(pts.iter().map(|(x, y)| Coord { x: *x, y: *y }).collect()),
    }
}

/// A street running east into a gravel footway, both along 47.68N.
fn network() -> WayNetwork {
    WayNetwork {
        ways: vec![
            way(
                1,
                "residential",
                Some("asphalt"),
                Some("N 80th St"),
                &[(-122.3405, 47.68), (-122.3387, 47.68)],
            ),
            way(
                2,
                "footway",
                Some("gravel"),
                None,
                &[(-122.3387, 47.68), (-122.3365, 47.68)],
            ),
        ],
    }
}

/// Three equal segments heading east. The first runs along the street, the rest along the
/// footway.
fn route_points() -> Vec<TrackPoint> {
    [-122.340, -122.339, -122.338, -122.337]
        .into_iter()
        .map(|lon| TrackPoint::new(47.68, lon, None))
        .collect()
}

#[test]
fn test_taxonomy() {
    assert_eq!(surface_material(Some("Asphalt")), Material::Paved);
    assert_eq!(surface_material(Some("woodchips")), Material::Unpaved);
    assert_eq!(surface_material(Some("")), Material::Unknown);
    assert_eq!(surface_material(None), Material::Unknown);

    assert_eq!(material_from_highway("cycleway"), Material::Paved);
    assert_eq!(material_from_highway("track"), Material::Unpaved);
    assert_eq!(material_from_highway("service"), Material::Unknown);

    assert_eq!(infrastructure("service", None), Infrastructure::Street);
    assert_eq!(infrastructure("primary_link", None), Infrastructure::Street);
    assert_eq!(infrastructure("cycleway", None), Infrastructure::Trail);
    assert_eq!(infrastructure("footway", None), Infrastructure::Sidewalk);
    assert_eq!(infrastructure("footway", Some("Gravel")), Infrastructure::Trail);
    assert_eq!(infrastructure("steps", Some("concrete")), Infrastructure::Sidewalk);
    assert_eq!(infrastructure("steps", Some("ground")), Infrastructure::Trail);
    assert_eq!(infrastructure("bus_stop", None), Infrastructure::Unknown);

    assert_eq!(
        classify_way("steps", Some("wood")),
        WayClass {
            material: Material::Unpaved,
            infrastructure: Infrastructure::Trail,
            stairs: true,
        }
    );
    // An unrecognized surface falls back on the highway type
    assert_eq!(
        classify_way("residential", Some("chipseal")).material,
        Material::Paved
    );
}

#[test]
fn test_stroke_colors() {
    assert_eq!(stroke_color(Material::Paved, Infrastructure::Street), "#1f77b4");
    assert_eq!(stroke_color(Material::Unpaved, Infrastructure::Trail), "#e377c2");
    assert_eq!(stroke_color(Material::Unpaved, Infrastructure::Unknown), "#7f7f7f");
    assert_eq!(stroke_color(Material::Unknown, Infrastructure::Street), "#bcbd22");
}

#[test]
fn test_projection() {
    let projection = LocalProjection::new(Coord {
        x: -122.34,
        y: 47.68,
    });
    let origin = projection.project(Coord {
        x: -122.34,
        y: 47.68,
    });
    assert_eq!(origin, Coord { x: 0.0, y: 0.0 });

    let north = projection.project(Coord {
        x: -122.34,
        y: 47.681,
    });
    assert!((north.y - 111.195).abs() < 0.01);
    let east = projection.project(Coord {
        x: -122.339,
        y: 47.68,
    });
    assert!((east.x - 74.86).abs() < 0.1);
}

#[test]
fn test_segments() {
    let index = SurfaceIndex::new(&network(), DEFAULT_BUFFER_METERS);
    let segments = surface_segments(&route_points(), &index, "test-loop");
    assert_eq!(segments.len(), 3);

    assert_eq!(segments[0].class.material, Material::Paved);
    assert_eq!(segments[0].class.infrastructure, Infrastructure::Street);
    assert_eq!(segments[0].way_name.as_deref(), Some("N 80th St"));
    assert_eq!(segments[0].way_highway.as_deref(), Some("residential"));

    // Touches both ways, but the midpoint is on the footway
    assert_eq!(segments[1].class.infrastructure, Infrastructure::Trail);
    assert_eq!(segments[1].way_surface.as_deref(), Some("gravel"));
    assert_eq!(segments[1].way_name, None);
    assert_eq!(segments[2].class.material, Material::Unpaved);

    assert_eq!(segments[2].segment_index, 2);
    assert_eq!(segments[2].route_id, "test-loop");
    assert!((segments[0].length_miles - 0.0465).abs() < 0.001);
}

#[test]
fn test_percentages() {
    let index = SurfaceIndex::new(&network(), DEFAULT_BUFFER_METERS);
    let percentages = surface_percentages(&route_points(), &index);
    assert_eq!(
        percentages,
        SurfacePercentages {
            paved: 33.3,
            unpaved: 66.7,
            street: 33.3,
            trail: 66.7,
            sidewalk: 0.0,
            stairs: 0.0,
        }
    );
}

#[test]
fn test_nearest_way_wins() {
    let mut network = network();
    // A sidewalk 10m north of the street, just under 15 Web Mercator meters at this latitude
    network.ways.push(way(
        3,
        "footway",
        Some("concrete"),
        None,
        &[(-122.3405, 47.68009), (-122.3387, 47.68009)],
    ));
    let index = SurfaceIndex::new(&network, DEFAULT_BUFFER_METERS);
    assert_eq!(index.metric(), DistanceMetric::WebMercator);
    let points = route_points();
    assert_eq!(
        index.nearby_ways(points[0].coord(), points[1].coord()),
        vec![0, 2]
    );
    let segments = surface_segments(&points, &index, "x");
    assert_eq!(segments[0].class.infrastructure, Infrastructure::Street);

    // Only the sidewalk is within a tighter buffer of a route shifted north
    let shifted: Vec<TrackPoint> = points
        .iter()
        .map(|pt| TrackPoint::new(pt.lat + 0.00012, pt.lon, None))
        .collect();
    let index = SurfaceIndex::new(&network, 8.0);
    let segments = surface_segments(&shifted, &index, "x");
    assert_eq!(segments[0].class.infrastructure, Infrastructure::Sidewalk);
    assert_eq!(segments[2].class, WayClass::UNKNOWN);

    // The same in true meters
    let index = SurfaceIndex::with_metric(&network, 5.0, DistanceMetric::LocalMeters);
    let segments = surface_segments(&shifted, &index, "x");
    assert_eq!(segments[0].class.infrastructure, Infrastructure::Sidewalk);
    assert_eq!(segments[2].class, WayClass::UNKNOWN);
}

#[test]
fn test_web_mercator() {
    let origin = web_mercator(Coord { x: 0.0, y: 0.0 });
    assert!(origin.x.abs() < 1e-9 && origin.y.abs() < 1e-9);

    // Near 47.68N, one true meter is about 1.485 Web Mercator meters
    let a = web_mercator(Coord {
        x: -122.34,
        y: 47.68,
    });
    let b = web_mercator(Coord {
        x: -122.34,
        y: 47.681,
    });
    assert!((b.y - a.y - 111.195 * 1.485).abs() < 0.5, "{}", b.y - a.y);
}

/// A short north-south segment centered on (47.68, -122.34).
fn short_segment() -> (Coord, Coord) {
    (
        Coord {
            x: -122.34,
            y: 47.67995,
        },
        Coord {
            x: -122.34,
            y: 47.68005,
        },
    )
}

#[test]
fn test_nearest_way_metric() {
    // A street about 8m east of the midpoint, and a path about 9m north of it. In degrees the
    // path is nearer, since a degree of longitude is shorter than one of latitude.
    let network = WayNetwork {
        ways: vec![
            way(
                1,
                "residential",
                None,
                None,
                &[(-122.339893, 47.6799), (-122.339893, 47.6801)],
            ),
            way(
                2,
                "path",
                None,
                None,
                &[(-122.3402, 47.6800809), (-122.3398, 47.6800809)],
            ),
        ],
    };
    let (from, to) = short_segment();

    let index = SurfaceIndex::new(&network, DEFAULT_BUFFER_METERS);
    assert_eq!(index.nearby_ways(from, to), vec![0, 1]);
    assert_eq!(index.attribute_segment(from, to).unwrap().way.id, 2);

    let index =
        SurfaceIndex::with_metric(&network, DEFAULT_BUFFER_METERS, DistanceMetric::LocalMeters);
    assert_eq!(index.nearby_ways(from, to), vec![0, 1]);
    assert_eq!(index.attribute_segment(from, to).unwrap().way.id, 1);
}

#[test]
fn test_buffer_metric() {
    // A street 12m east of the segment. 15 Web Mercator meters only reach about 10m here.
    let network = WayNetwork {
        ways: vec![way(
            1,
            "residential",
            None,
            None,
            &[(-122.339839, 47.6799), (-122.339839, 47.6801)],
        )],
    };
    let (from, to) = short_segment();

    let index = SurfaceIndex::new(&network, DEFAULT_BUFFER_METERS);
    assert!(index.nearby_ways(from, to).is_empty());
    assert!(index.attribute_segment(from, to).is_none());

    let index =
        SurfaceIndex::with_metric(&network, DEFAULT_BUFFER_METERS, DistanceMetric::LocalMeters);
    assert_eq!(index.attribute_segment(from, to).unwrap().way.id, 1);
}

#[test]
fn test_ties_go_to_earlier_way() {
    // A sidewalk mapped right on top of the street, so the midpoint touches both
    let street = way(
        1,
        "residential",
        Some("asphalt"),
        None,
        &[(-122.3405, 47.68), (-122.3387, 47.68)],
    );
    let sidewalk = way(
        2,
        "footway",
        Some("concrete"),
        None,
        &[(-122.3402, 47.68), (-122.3385, 47.68)],
    );
    let points = route_points();
    let (from, to) = (points[0].coord(), points[1].coord());

    for metric in [DistanceMetric::WebMercator, DistanceMetric::LocalMeters] {
        let network = WayNetwork {
            ways: vec![street.clone(), sidewalk.clone()],
        };
        let index = SurfaceIndex::with_metric(&network, DEFAULT_BUFFER_METERS, metric);
        assert_eq!(index.attribute_segment(from, to).unwrap().way.id, 1);

        let network = WayNetwork {
            ways: vec![sidewalk.clone(), street.clone()],
        };
        let index = SurfaceIndex::with_metric(&network, DEFAULT_BUFFER_METERS, metric);
        assert_eq!(index.attribute_segment(from, to).unwrap().way.id, 2);
    }
}

#[test]
fn test_no_ways_nearby() {
    let far: Vec<TrackPoint> = route_points()
        .iter()
        .map(|pt| TrackPoint::new(pt.lat + 0.01, pt.lon, None))
        .collect();
    let index = SurfaceIndex::new(&network(), DEFAULT_BUFFER_METERS);
    assert_eq!(surface_percentages(&far, &index), SurfacePercentages::default());
    assert!(surface_segments(&far, &index, "far")
        .iter()
        .all(|s| s.class == WayClass::UNKNOWN && s.way_highway.is_none()));

    let empty = SurfaceIndex::new(&WayNetwork::default(), DEFAULT_BUFFER_METERS);
    assert!(empty.is_empty());
    assert_eq!(
        surface_percentages(&route_points(), &empty),
        SurfacePercentages::default()
    );

    // A single point has no length
    assert_eq!(
        surface_percentages(&route_points()[..1], &index),
        SurfacePercentages::default()
    );
}

#[test]
fn test_segments_geojson() {
    let index = SurfaceIndex::new(&network(), DEFAULT_BUFFER_METERS);
    let segments = surface_segments(&route_points(), &index, "test-loop");
    let fc = segments_geojson(&segments);
    assert_eq!(fc.features.len(), 3);

    let f = &fc.features[0];
    assert_eq!(
        f.geometry.as_ref().unwrap().value,
        geojson::Value::LineString(vec![vec![-122.340, 47.68], vec![-122.339, 47.68]])
    );
    assert_eq!(f.property("route_id").unwrap(), "test-loop");
    assert_eq!(f.property("segment_index").unwrap(), 0);
    assert_eq!(f.property("material").unwrap(), "paved");
    assert_eq!(f.property("infrastructure").unwrap(), "street");
    assert_eq!(f.property("stroke").unwrap(), "#1f77b4");
    assert_eq!(f.property("stroke-width").unwrap(), 3);
    assert_eq!(f.property("stroke-opacity").unwrap(), 0.8);
    assert_eq!(f.property("way_name").unwrap(), "N 80th St");

    let length = f.property("length_miles").unwrap().as_f64().unwrap();
    assert_eq!(length, (length * 10_000.0).round() / 10_000.0);

    assert!(fc.features[1].property("way_name").unwrap().is_null());
    assert_eq!(fc.features[1].property("stroke").unwrap(), "#e377c2");
}

const GREEN_LAKE: &str = include_str!("../../testdata/green-lake-loop.gpx");

fn example_percentages() -> SurfacePercentages {
    SurfacePercentages {
        paved: 33.3,
        unpaved: 66.7,
        street: 33.3,
        trail: 66.7,
        sidewalk: 0.0,
        stairs: 0.0,
    }
}

#[test]
fn test_add_surface_tags() {
    let tagged = add_surface_tags(GREEN_LAKE, &example_percentages()).unwrap();
    assert!(tagged.contains(
        "      <rcr:changelog>\n        <rcr:change>\n          <rcr:date>2024-05-01</rcr:date>"
    ));
    assert!(tagged.contains(
        "      <rcr:surface_trail>0.667</rcr:surface_trail>\n      <rcr:surface_sidewalk>0.000</rcr:surface_sidewalk>\n      <rcr:stairs>0.000</rcr:stairs>\n    </extensions>\n  </metadata>"
    ));

    let route = route_from_gpx_str(&tagged, Path::new("green-lake-loop.gpx")).unwrap();
    let shares = route.surface_shares.unwrap();
    assert_eq!(shares.paved, 0.333);
    assert_eq!(shares.unpaved, 0.667);
    assert_eq!(shares.stairs, 0.0);
    assert_eq!(route.points.len(), 9);
    assert_eq!(route.surface.as_deref(), Some("Road"));

    // Tagging again replaces the old values instead of piling up
    let retagged = add_surface_tags(&tagged, &SurfacePercentages::default()).unwrap();
    assert_eq!(retagged.matches("<rcr:surface_paved>").count(), 1);
    assert!(retagged.contains("<rcr:surface_paved>0.000</rcr:surface_paved>"));
    assert_eq!(
        add_surface_tags(&retagged, &example_percentages()).unwrap(),
        tagged
    );
}

#[test]
fn test_add_surface_tags_without_extensions() {
    let bare = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx xmlns="http://www.topografix.com/GPX/1/1" version="1.1" creator="test" xmlns:rcr="http://raceconditionrunning.com/extensions">
  <metadata>
    <name>bare</name>
  </metadata>
  <trk>
    <desc>Bare (0.1 mi)</desc>
    <trkseg>
      <trkpt lat="47.68" lon="-122.34"/>
      <trkpt lat="47.681" lon="-122.34"/>
    </trkseg>
  </trk>
</gpx>
"#;
    let tagged = add_surface_tags(bare, &example_percentages()).unwrap();
    assert!(tagged.contains(
        "    <name>bare</name>\n    <extensions>\n      <rcr:surface_paved>0.333</rcr:surface_paved>"
    ));
    assert!(tagged.ends_with("</gpx>\n"));
    let route = route_from_gpx_str(&tagged, Path::new("bare.gpx")).unwrap();
    assert_eq!(route.surface_shares.unwrap().trail, 0.667);

    assert!(add_surface_tags("<gpx></gpx>", &example_percentages()).is_err());
}
