//! Extracts the OSM ways that matter for surface classification: everything tagged `highway`,
//! with its `surface` and `name`.

mod overpass;
#[cfg(test)]
mod tests;

use std::collections::HashMap;

use anyhow::{bail, Result};
use geo::{Coord, Intersects, LineString, Rect};
use log::info;
use osm_reader::Element;

use route_model::{Route, Way, WayNetwork};

pub use overpass::{overpass_query, OverpassClient, DEFAULT_OVERPASS_URL};

/// Convert input OSM PBF or XML data into a WayNetwork. If a bounding box is specified, ways that
/// don't touch it are dropped.
pub fn scrape_ways(input_bytes: &[u8], bbox: Option<Rect>) -> Result<WayNetwork> {
    info!("Scraping OSM data");
    // Scrape every node ID -> Coord
    let mut nodes = HashMap::new();
    // Ways in file order, with the node IDs still unresolved
    let mut raw_ways = Vec::new();

    osm_reader::parse(input_bytes, |elem| match elem {
        Element::Node { id, lon, lat, .. } => {
            nodes.insert(id, Coord { x: lon, y: lat });
        }
        Element::Way {
            id, node_ids, tags, ..
        } => {
            if let Some(highway) = tags.get("highway") {
                raw_ways.push((
                    Way {
                        id: id.0,
                        highway: highway.to_string(),
                        surface: tags.get("surface").map(|x| x.to_string()),
                        name: tags.get("name").map(|x| x.to_string()),
                        geometry: LineString::new(Vec::new()),
                    },
                    node_ids,
                ));
            }
        }
        _ => {}
    })?;
    info!(
        "Got {} nodes and {} highway ways",
        nodes.len(),
        raw_ways.len()
    );

    let mut network = WayNetwork::default();
    let mut unresolved = 0;
    let mut outside = 0;
    for (mut way, node_ids) in raw_ways {
        let pts: Vec<Coord> = node_ids
            .iter()
            .filter_map(|node| nodes.get(node).copied())
            .collect();
        if pts.len() < 2 {
            unresolved += 1;
            continue;
        }
        way.geometry = LineString::new(pts);
        if let Some(bbox) = bbox {
            if !way.geometry.intersects(&bbox) {
                outside += 1;
                continue;
            }
        }
        network.ways.push(way);
    }

    if unresolved > 0 {
        log::warn!("Skipped {unresolved} ways with fewer than 2 known nodes");
    }
    info!(
        "Kept {} ways, {outside} outside the bounding box",
        network.ways.len()
    );
    Ok(network)
}

/// The bounding box of every point in every route, grown by `padding` degrees on each side.
pub fn routes_bbox(routes: &[Route], padding: f64) -> Result<Rect> {
    let mut points = routes.iter().flat_map(|route| route.points.iter());
    let Some(first) = points.next() else {
        bail!("no route points to take a bounding box from");
    };

    let (mut south, mut north) = (first.lat, first.lat);
    let (mut west, mut east) = (first.lon, first.lon);
    for pt in points {
        south = south.min(pt.lat);
        north = north.max(pt.lat);
        west = west.min(pt.lon);
        east = east.max(pt.lon);
    }
    Ok(Rect::new(
        Coord {
            x: west - padding,
            y: south - padding,
        },
        Coord {
            x: east + padding,
            y: north + padding,
        },
    ))
}

/// Download and scrape every highway way around the routes.
pub fn fetch_network(
    client: &OverpassClient,
    routes: &[Route],
    padding: f64,
) -> Result<WayNetwork> {
    let bbox = routes_bbox(routes, padding)?;
    let bytes = client.fetch(bbox)?;
    scrape_ways(&bytes, Some(bbox))
}
