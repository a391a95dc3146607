//! `GeoJSON` `FeatureCollection` loader.
//!
//! Turns each feature into a row: the feature's properties become columns
//! and its geometry is stored, still as a `GeoJSON` geometry object, under
//! a configurable geometry column. Geometry is only converted to `geo`
//! types once a fused row is projected into a segment.

use std::path::Path;

use geojson::GeoJson;
use serde_json::Value;

use crate::{Row, SourceError, SourceTable};

/// Reads a `GeoJSON` file from disk.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or is not a
/// `FeatureCollection`.
pub fn read_features_path(
    name: &str,
    path: &Path,
    geometry_column: &str,
) -> Result<SourceTable, SourceError> {
    log::info!("[{name}] Reading GeoJSON {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    read_features(name, &contents, geometry_column)
}

/// Parses a `GeoJSON` `FeatureCollection` string into a table.
///
/// Columns are the union of all property names in first-seen order,
/// followed by `geometry_column`.
///
/// # Errors
///
/// Returns [`SourceError`] if the input is not valid `GeoJSON` or is not a
/// `FeatureCollection`.
pub fn read_features(
    name: &str,
    geojson_str: &str,
    geometry_column: &str,
) -> Result<SourceTable, SourceError> {
    let GeoJson::FeatureCollection(collection) = geojson_str.parse::<GeoJson>()? else {
        return Err(SourceError::Normalization {
            message: format!("GeoJSON source '{name}' is not a FeatureCollection"),
        });
    };

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(collection.features.len());

    for feature in collection.features {
        let mut row = Row::new();

        if let Some(properties) = feature.properties {
            for (key, value) in properties {
                if key == geometry_column {
                    log::warn!("[{name}] Ignoring property '{key}' shadowing the geometry column");
                    continue;
                }
                if !columns.contains(&key) {
                    columns.push(key.clone());
                }
                row.insert(key, value);
            }
        }

        let geometry = match feature.geometry {
            Some(geometry) => serde_json::to_value(&geometry)?,
            None => Value::Null,
        };
        row.insert(geometry_column.to_string(), geometry);

        rows.push(row);
    }

    columns.push(geometry_column.to_string());

    log::info!("[{name}] Parsed {} features", rows.len());

    Ok(SourceTable::new(name, columns, rows))
}
