use geo::LineString;
use route_model::{Way, WayNetwork};

use super::*;

#[test]
fn test_network_geojson() {
    let network = WayNetwork {
        ways: vec![
            Way {
                id: 10,
                highway: "footway".to_string(),
                surface: Some("gravel".to_string()),
                name: None,
                geometry: LineString::from(vec![(-122.34, 47.68), (-122.34, 47.681)]),
            },
            Way {
                id: 11,
                highway: "residential".to_string(),
                surface: None,
                name: Some("Ashworth Ave N".to_string()),
                geometry: LineString::from(vec![(-122.34, 47.68), (-122.338, 47.68)]),
            },
        ],
    };

    let fc = network_geojson(&network);
    assert_eq!(fc.features.len(), 2);

    let f = &fc.features[0];
    assert_eq!(f.property("osm_id").unwrap(), 10);
    assert_eq!(f.property("highway").unwrap(), "footway");
    assert_eq!(f.property("surface").unwrap(), "gravel");
    assert!(f.property("name").unwrap().is_null());
    // 0.001 degrees of latitude is about 111m
    let length = f.property("length_meters").unwrap().as_f64().unwrap();
    assert!((length - 111.2).abs() < 0.5, "{length}");

    let f = &fc.features[1];
    assert_eq!(f.property("way_idx").unwrap(), 1);
    assert_eq!(f.property("name").unwrap(), "Ashworth Ave N");
    assert!(f.property("surface").unwrap().is_null());
}

#[test]
fn test_empty_network() {
    assert!(network_geojson(&WayNetwork::default()).features.is_empty());
}
