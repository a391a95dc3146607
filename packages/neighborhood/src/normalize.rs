//! Normalizes `GeoJSON` features into named polygons.
//!
//! Uses the layer's [`NeighborhoodLayer::name_field`] to extract each
//! region's name regardless of the file's property naming.

use geo::MultiPolygon;
use geojson::Feature;
use street_heat_neighborhood_models::NeighborhoodLayer;

/// A named region polygon, ready for indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedBoundary {
    /// Region name, possibly the layer's "unnamed" sentinel.
    pub name: String,
    /// Region polygon(s).
    pub polygon: MultiPolygon<f64>,
}

/// Normalizes a list of features into boundaries.
///
/// Skips features without polygon geometry, and features without a name
/// when the layer defines no sentinel for them.
#[must_use]
pub fn normalize_features(features: &[Feature], layer: &NeighborhoodLayer) -> Vec<NamedBoundary> {
    let boundaries: Vec<NamedBoundary> = features
        .iter()
        .filter_map(|feature| normalize_feature(feature, layer))
        .collect();

    if boundaries.len() < features.len() {
        log::warn!(
            "{}: skipped {} of {} features without a usable name or polygon",
            layer.path,
            features.len() - boundaries.len(),
            features.len()
        );
    }

    boundaries
}

/// Normalizes a single feature.
fn normalize_feature(feature: &Feature, layer: &NeighborhoodLayer) -> Option<NamedBoundary> {
    let name = feature
        .property(&layer.name_field)
        .and_then(property_to_name)
        .or_else(|| layer.unnamed.clone())?;

    let polygon = to_multipolygon(feature.geometry.clone()?)?;

    Some(NamedBoundary { name, polygon })
}

/// Names are usually strings; numeric section codes are accepted too.
fn property_to_name(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn to_multipolygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::GeoJson;

    fn features(json: &str) -> Vec<Feature> {
        match json.parse::<GeoJson>().unwrap() {
            GeoJson::FeatureCollection(fc) => fc.features,
            other => panic!("expected a FeatureCollection, got {other:?}"),
        }
    }

    const LAYER: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "Name": " Back Bay " },
                "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]] }
            },
            {
                "type": "Feature",
                "properties": { "Name": "" },
                "geometry": { "type": "Polygon", "coordinates": [[[2,0],[3,0],[3,1],[2,1],[2,0]]] }
            },
            {
                "type": "Feature",
                "properties": { "Name": "Fenway" },
                "geometry": { "type": "Point", "coordinates": [5, 5] }
            }
        ]
    }"#;

    fn layer(unnamed: Option<&str>) -> NeighborhoodLayer {
        NeighborhoodLayer {
            path: "sections.geojson".to_string(),
            name_field: "Name".to_string(),
            unnamed: unnamed.map(ToString::to_string),
        }
    }

    #[test]
    fn trims_names_and_skips_non_polygons() {
        let boundaries = normalize_features(&features(LAYER), &layer(None));
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].name, "Back Bay");
    }

    #[test]
    fn blank_names_take_the_sentinel() {
        let boundaries = normalize_features(&features(LAYER), &layer(Some("Unnamed")));
        let names: Vec<&str> = boundaries.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Back Bay", "Unnamed"]);
    }
}
