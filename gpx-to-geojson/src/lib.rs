//! Converts routes to GeoJSON Features for the website's maps, and merges GeoJSON files.


use std::path::Path;

use anyhow::{bail, Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use serde_json::json;

use route_model::Route;

/// A LineString Feature with the route's metadata as properties. Coordinates carry a third
/// elevation value wherever the route recorded a nonzero one.
pub fn route_feature(route: &Route) -> Feature {
    let coordinates = route
        .points
        .iter()
        .map(|pt| match pt.recorded_elevation() {
            Some(ele) => vec![pt.lon, pt.lat, ele],
            None => vec![pt.lon, pt.lat],
        })
        .collect();
    let mut f = Feature::from(Geometry::from(Value::LineString(coordinates)));

    f.set_property("id", route.id.clone());
    f.set_property("name", route.name.clone());
    f.set_property("start", route.start.clone());
    f.set_property("distance_mi", route.distance_mi);
    f.set_property("ascent_m", route.ascent_m);
    f.set_property("descent_m", route.descent_m);
    f.set_property("end", route.end.clone());
    f.set_property("surface", route.surface.clone());
    f.set_property("map", route.map.clone());
    f.set_property("deprecated", route.deprecated);
    f.set_property("last_updated", route.last_updated.clone());
    if route.changelog.is_empty() {
        f.set_property("changelog", serde_json::Value::Null);
    } else {
        f.set_property("changelog", json!(route.changelog));
    }
    f.set_property("notes", route.notes.clone());
    f
}

/// Pretty-prints everything except the geometry, which goes on one line. Indenting every
/// coordinate would otherwise double the file size.
pub fn write_compact(feature: &Feature) -> Result<String> {
    let properties = feature.properties.clone().unwrap_or_default();
    let properties = serde_json::to_string_pretty(&properties)?;
    // Pretty JSON escapes newlines inside strings, so every raw one is between values
    let properties = properties.replace('\n', "\n  ");
    let geometry = serde_json::to_string(&feature.geometry)?;
    Ok(format!(
        "{{\n  \"type\": \"Feature\",\n  \"properties\": {properties}, \"geometry\":{geometry}\n}}"
    ))
}

/// Every Feature from the inputs, which may each hold a FeatureCollection or a single Feature.
pub fn merge_feature_collections<P: AsRef<Path>>(inputs: &[P]) -> Result<FeatureCollection> {
    let mut features = Vec::new();
    for path in inputs {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        features.extend(parse_features(&text).with_context(|| format!("in {}", path.display()))?);
    }
    Ok(features.into_iter().collect())
}

fn parse_features(text: &str) -> Result<Vec<Feature>> {
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => Ok(fc.features),
        GeoJson::Feature(f) => Ok(vec![f]),
        GeoJson::Geometry(_) => {
            bail!("expected a FeatureCollection or Feature, not a bare Geometry")
        }
    }
}
