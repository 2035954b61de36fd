use std::path::PathBuf;

use geo::{Coord, Rect};
use route_model::{Route, TrackPoint, WayNetwork};

use super::*;

const OSM_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="hand">
  <node id="1" version="1" lat="47.68" lon="-122.34"/>
  <node id="2" version="1" lat="47.681" lon="-122.34"/>
  <node id="3" version="1" lat="47.682" lon="-122.34"/>
  <node id="4" version="1" lat="48.5" lon="-121.0"/>
  <node id="5" version="1" lat="48.501" lon="-121.0"/>
  <way id="10" version="1">
    <nd ref="1"/>
    <nd ref="2"/>
    <tag k="highway" v="footway"/>
    <tag k="surface" v="gravel"/>
    <tag k="name" v="Green Lake Trail"/>
  </way>
  <way id="11" version="1">
    <nd ref="2"/>
    <nd ref="3"/>
    <tag k="building" v="yes"/>
  </way>
  <way id="12" version="1">
    <nd ref="3"/>
    <nd ref="99"/>
    <tag k="highway" v="residential"/>
  </way>
  <way id="13" version="1">
    <nd ref="2"/>
    <nd ref="3"/>
    <tag k="highway" v="residential"/>
  </way>
  <way id="14" version="1">
    <nd ref="4"/>
    <nd ref="5"/>
    <tag k="highway" v="track"/>
  </way>
</osm>"#;

fn route(points: Vec<TrackPoint>) -> Route {
    Route {
        id: "test-loop".to_string(),
        name: "Test Loop".to_string(),
        distance_mi: 1.0,
        ascent_m: None,
        descent_m: None,
        route_type: None,
        surface: None,
        map: None,
        start: None,
        end: None,
        deprecated: false,
        notes: None,
        last_updated: None,
        changelog: Vec::new(),
        surface_shares: None,
        points,
        path: PathBuf::from("test-loop.gpx"),
    }
}

#[test]
fn test_scrape_highways() {
    let network = scrape_ways(OSM_XML.as_bytes(), None).unwrap();
    let ids: Vec<i64> = network.ways.iter().map(|w| w.id).collect();
    // The building isn't a highway, and way 12 only has one known node
    assert_eq!(ids, vec![10, 13, 14]);

    let trail = &network.ways[0];
    assert_eq!(trail.highway, "footway");
    assert_eq!(trail.surface.as_deref(), Some("gravel"));
    assert_eq!(trail.name.as_deref(), Some("Green Lake Trail"));
    assert_eq!(trail.geometry.0.len(), 2);
    assert_eq!(trail.geometry.0[0], Coord { x: -122.34, y: 47.68 });

    assert_eq!(network.ways[1].surface, None);
    assert_eq!(network.ways[1].name, None);
}

#[test]
fn test_scrape_clips_to_bbox() {
    let bbox = Rect::new(
        Coord {
            x: -122.35,
            y: 47.67,
        },
        Coord {
            x: -122.33,
            y: 47.69,
        },
    );
    let network = scrape_ways(OSM_XML.as_bytes(), Some(bbox)).unwrap();
    let ids: Vec<i64> = network.ways.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![10, 13]);
}

#[test]
fn test_routes_bbox() {
    let routes = vec![
        route(vec![
            TrackPoint::new(47.68, -122.34, None),
            TrackPoint::new(47.69, -122.33, None),
        ]),
        route(vec![TrackPoint::new(47.60, -122.35, Some(3.0))]),
    ];
    let bbox = routes_bbox(&routes, 0.01).unwrap();
    assert!((bbox.min().x - -122.36).abs() < 1e-9);
    assert!((bbox.min().y - 47.59).abs() < 1e-9);
    assert!((bbox.max().x - -122.32).abs() < 1e-9);
    assert!((bbox.max().y - 47.70).abs() < 1e-9);

    assert!(routes_bbox(&[route(Vec::new())], 0.01).is_err());
}

#[test]
fn test_overpass_query() {
    let bbox = Rect::new(Coord { x: -122.5, y: 47.5 }, Coord { x: -122.0, y: 47.75 });
    assert_eq!(
        overpass_query(bbox),
        "[out:xml][timeout:180];(way[\"highway\"](47.5,-122.5,47.75,-122););(._;>;);out body;"
    );
}

#[test]
fn test_network_file() {
    let network = scrape_ways(OSM_XML.as_bytes(), None).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ways.bin");
    network.save(&path).unwrap();
    let loaded = WayNetwork::load(&path).unwrap();
    assert_eq!(loaded.ways, network.ways);
}
