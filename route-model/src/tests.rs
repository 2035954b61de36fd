use std::path::Path;

use crate::*;

const GREEN_LAKE: &str = include_str!("../../testdata/green-lake-loop.gpx");
const LOCS: &str = include_str!("../../testdata/locs.csv");

fn green_lake() -> Route {
    route_from_gpx_str(GREEN_LAKE, Path::new("routes/gpx/green-lake-loop.gpx")).unwrap()
}

#[test]
fn test_load_canonical_route() {
    let route = green_lake();
    assert_eq!(route.id, "green-lake-loop");
    assert_eq!(route.name, "Green Lake Loop");
    assert_eq!(route.distance_mi, 0.6);
    assert_eq!(route.ascent_m, Some(4.0));
    assert_eq!(route.descent_m, Some(4.0));
    assert_eq!(route.surface.as_deref(), Some("Road"));
    assert_eq!(route.start.as_deref(), Some("GreenLake"));
    assert_eq!(route.end.as_deref(), Some("GreenLake"));
    assert!(!route.deprecated);
    assert_eq!(route.surface_shares, None);
    // No type extension, so it comes from the id
    assert_eq!(route.route_type, Some(RouteType::Loop));

    assert_eq!(route.points.len(), 9);
    assert_eq!(route.points[0], TrackPoint::new(47.68, -122.34, Some(50.0)));
    assert_eq!(route.points[6].elevation, None);
    route.check_path().unwrap();
}

#[test]
fn test_zero_elevation_is_unrecorded() {
    assert_eq!(TrackPoint::new(47.68, -122.34, Some(0.0)).recorded_elevation(), None);
    assert_eq!(TrackPoint::new(47.68, -122.34, None).recorded_elevation(), None);
    assert_eq!(TrackPoint::new(47.68, -122.34, Some(-3.5)).recorded_elevation(), Some(-3.5));
}

#[test]
fn test_changelog_is_unescaped() {
    let route = green_lake();
    assert_eq!(
        route.changelog,
        vec![Change {
            date: "2024-05-01".to_string(),
            note: "Rerouted around construction & fencing".to_string(),
        }]
    );
}

#[test]
fn test_rogue_path() {
    let route =
        route_from_gpx_str(GREEN_LAKE, Path::new("routes/gpx/green-lake-loop.GPX")).unwrap();
    assert!(matches!(
        route.check_path(),
        Err(RouteError::RoguePath { .. })
    ));
}

#[test]
fn test_route_element_wins_and_extensions_override() {
    let gpx = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx xmlns="http://www.topografix.com/GPX/1/1" version="1.1" creator="test" xmlns:rcr="http://raceconditionrunning.com/extensions">
  <metadata>
    <extensions>
      <rcr:name>Ballard to Fremont</rcr:name>
      <rcr:distance>3.2</rcr:distance>
      <rcr:type>P2P</rcr:type>
      <rcr:deprecated>true</rcr:deprecated>
      <rcr:surface_paved>0.750</rcr:surface_paved>
      <rcr:stairs>0.010</rcr:stairs>
    </extensions>
  </metadata>
  <rte>
    <rtept lat="47.668" lon="-122.384"/>
    <rtept lat="47.651" lon="-122.350"/>
  </rte>
</gpx>"#;
    let route = route_from_gpx_str(gpx, Path::new("ballard-fremont.gpx")).unwrap();
    assert_eq!(route.name, "Ballard to Fremont");
    assert_eq!(route.distance_mi, 3.2);
    assert_eq!(route.route_type, Some(RouteType::PointToPoint));
    assert!(route.deprecated);
    assert_eq!(route.points.len(), 2);
    let shares = route.surface_shares.unwrap();
    assert_eq!(shares.paved, 0.75);
    assert_eq!(shares.stairs, 0.01);
    assert_eq!(shares.trail, 0.0);
}

#[test]
fn test_two_tracks_is_bogus() {
    let gpx = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx xmlns="http://www.topografix.com/GPX/1/1" version="1.1" creator="test">
  <trk><desc>A (1.0 mi)</desc><trkseg><trkpt lat="47.0" lon="-122.0"/></trkseg></trk>
  <trk><desc>B (1.0 mi)</desc><trkseg><trkpt lat="47.1" lon="-122.0"/></trkseg></trk>
</gpx>"#;
    let err = route_from_gpx_str(gpx, Path::new("two.gpx")).unwrap_err();
    assert!(matches!(err, RouteError::GpxFormat { .. }));
}

#[test]
fn test_missing_distance_is_an_error() {
    let gpx = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx xmlns="http://www.topografix.com/GPX/1/1" version="1.1" creator="test">
  <trk><desc>No distance here</desc><trkseg><trkpt lat="47.0" lon="-122.0"/></trkseg></trk>
</gpx>"#;
    let err = route_from_gpx_str(gpx, Path::new("nodist.gpx")).unwrap_err();
    assert!(matches!(err, RouteError::GpxFormat { .. }));
}

#[test]
fn test_type_from_id() {
    assert_eq!(RouteType::from_id("greenlake-ob"), Some(RouteType::OutAndBack));
    assert_eq!(RouteType::from_id("greenlake-o"), Some(RouteType::OutAndBack));
    assert_eq!(RouteType::from_id("greenlake-loop"), Some(RouteType::Loop));
    assert_eq!(RouteType::from_id("greenlake-loop-02"), Some(RouteType::Loop));
    assert_eq!(RouteType::from_id("greenlake-loop-2"), None);
    assert_eq!(RouteType::from_id("p2p-cse-beacon"), Some(RouteType::PointToPoint));
    assert_eq!(RouteType::from_id("greenlake"), None);
}

#[test]
fn test_parse_locations_ignores_extra_columns() {
    let locs = parse_locations(LOCS.as_bytes()).unwrap();
    assert_eq!(locs.len(), 3);
    assert_eq!(
        locs[0],
        Location {
            id: "GreenLake".to_string(),
            lat: 47.6801,
            lon: -122.3401,
        }
    );
}

#[test]
fn test_way_network_round_trip() {
    let network = WayNetwork {
        ways: vec![Way {
            id: 42,
            highway: "footway".to_string(),
            surface: Some("gravel".to_string()),
            name: None,
            geometry: vec![(-122.34, 47.68), (-122.33, 47.69)].into(),
        }],
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ways.bin");
    network.save(&path).unwrap();
    let loaded = WayNetwork::load(&path).unwrap();
    assert_eq!(loaded.ways, network.ways);
}
