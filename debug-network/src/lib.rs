#[cfg(test)]
mod tests;

use geo::{line_measures::LengthMeasurable, Haversine};
use geojson::{Feature, FeatureCollection, Geometry};

use route_model::WayNetwork;

/// One LineString feature per way, for eyeballing a scraped network in a GeoJSON viewer.
pub fn network_geojson(network: &WayNetwork) -> FeatureCollection {
    network
        .ways
        .iter()
        .enumerate()
        .map(|(idx, way)| {
            let mut f = Feature::from(Geometry::from(&way.geometry));
            f.set_property("way_idx", idx);
            f.set_property("osm_id", way.id);
            f.set_property("highway", way.highway.clone());
            f.set_property("surface", way.surface.clone());
            f.set_property("name", way.name.clone());
            f.set_property("length_meters", way.geometry.length(&Haversine));
            f
        })
        .collect()
}
