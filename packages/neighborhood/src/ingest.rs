//! Loading of neighborhood layers from `GeoJSON` files.

use std::path::Path;

use geojson::{Feature, GeoJson};
use street_heat_neighborhood_models::NeighborhoodLayer;

use crate::NeighborhoodError;
use crate::index::LayerIndex;

/// Loads and indexes a layer, resolving its path against `base_dir`.
///
/// # Errors
///
/// Returns [`NeighborhoodError`] if the file cannot be read or is not a
/// `GeoJSON` feature collection.
pub fn load_layer(
    base_dir: &Path,
    layer: &NeighborhoodLayer,
) -> Result<LayerIndex, NeighborhoodError> {
    let path = base_dir.join(&layer.path);
    log::info!("Loading neighborhood layer {}", path.display());

    let raw = std::fs::read_to_string(&path)?;
    let index = index_layer(&raw, layer)?;

    log::info!("{}: indexed {} regions", layer.path, index.len());
    Ok(index)
}

/// Parses and indexes a layer from `GeoJSON` text.
///
/// # Errors
///
/// Returns [`NeighborhoodError`] if the text is not a `GeoJSON` feature
/// collection.
pub fn index_layer(raw: &str, layer: &NeighborhoodLayer) -> Result<LayerIndex, NeighborhoodError> {
    let features = parse_features(raw, &layer.path)?;
    let boundaries = crate::normalize::normalize_features(&features, layer);
    log::debug!(
        "{}: normalized {} boundaries from {} features",
        layer.path,
        boundaries.len(),
        features.len()
    );
    Ok(LayerIndex::new(boundaries))
}

fn parse_features(raw: &str, label: &str) -> Result<Vec<Feature>, NeighborhoodError> {
    match raw.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => Ok(fc.features),
        GeoJson::Feature(_) | GeoJson::Geometry(_) => Err(NeighborhoodError::Conversion {
            message: format!("{label}: expected a FeatureCollection"),
        }),
    }
}
