//! Segments with no data.
//!
//! Street geometry covers more segments than the heat model does. The rows
//! of the geometry source whose key never made it into the fused table are
//! drawn as "no data" markers on maps, so they are exposed here as a
//! read-only view and as a `GeoJSON` export.

use geojson::{Feature, FeatureCollection};
use street_heat_source::{Row, SourceTable};

use crate::merge::row_key;
use crate::{FusedTable, FusionError};

/// Rows of `source` whose key is absent from `fused`, in source order.
///
/// # Errors
///
/// Returns [`FusionError`] if `source` lacks the join key or a non-null key
/// is not an integer. Rows with a null key never fused, so they are
/// included.
pub fn segments_without_data<'a>(
    fused: &FusedTable,
    source: &'a SourceTable,
) -> Result<Vec<&'a Row>, FusionError> {
    let key = fused.key();
    if !source.has_column(key) {
        return Err(FusionError::MissingJoinKey {
            source_name: source.name().to_string(),
            key: key.to_string(),
        });
    }

    let mut missing = Vec::new();
    for (index, row) in source.rows().iter().enumerate() {
        let id = row_key(source, index, row, key)?;
        if id.is_none_or(|id| !fused.contains(id)) {
            missing.push(row);
        }
    }

    log::info!(
        "[{}] {} of {} segment(s) have no fused data",
        source.name(),
        missing.len(),
        source.len()
    );

    Ok(missing)
}

/// Converts rows back into a `GeoJSON` `FeatureCollection`. Every column
/// other than `geometry_column` becomes a feature property.
///
/// # Errors
///
/// Returns [`FusionError::Geometry`] if a geometry cell is not a valid
/// `GeoJSON` geometry.
pub fn to_feature_collection(
    rows: &[&Row],
    key: &str,
    geometry_column: &str,
) -> Result<FeatureCollection, FusionError> {
    let mut features = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let geometry = match row.get(geometry_column) {
            Some(value) if !value.is_null() => Some(
                serde_json::from_value::<geojson::Geometry>(value.clone()).map_err(|e| {
                    FusionError::Geometry {
                        segment_id: row
                            .get(key)
                            .and_then(street_heat_source::segment_id_from_value)
                            .unwrap_or_default(),
                        message: format!("row {index}: {e}"),
                    }
                })?,
            ),
            _ => None,
        };

        let properties: Row = row
            .iter()
            .filter(|(column, _)| column.as_str() != geometry_column)
            .map(|(column, value)| (column.clone(), value.clone()))
            .collect();

        features.push(Feature {
            bbox: None,
            geometry,
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuse;
    use crate::merge::tests::table;
    use serde_json::json;

    #[test]
    fn finds_geometry_rows_missing_from_fused_table() {
        let heat = table(
            "urbanheat",
            &["TLID", "LST_weighted"],
            &[json!({ "TLID": 1, "LST_weighted": 90.0 })],
        );
        let geometry = table(
            "geometry",
            &["TLID", "geometry"],
            &[
                json!({ "TLID": 1, "geometry": null }),
                json!({ "TLID": 2, "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] } }),
            ],
        );

        let fused = fuse("TLID", &[&heat, &geometry]).unwrap();
        let missing = segments_without_data(&fused, &geometry).unwrap();

        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0]["TLID"], json!(2));

        let collection = to_feature_collection(&missing, "TLID", "geometry").unwrap();
        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        assert!(feature.geometry.is_some());
        assert_eq!(feature.property("TLID"), Some(&json!(2)));
        assert!(!feature.contains_property("geometry"));
    }

    #[test]
    fn keyless_geometry_rows_have_no_data() {
        let heat = table(
            "urbanheat",
            &["TLID", "LST_weighted"],
            &[json!({ "TLID": 1, "LST_weighted": 90.0 })],
        );
        let geometry = table(
            "geometry",
            &["TLID", "geometry"],
            &[
                json!({ "TLID": 1, "geometry": null }),
                json!({ "TLID": null, "geometry": null }),
            ],
        );

        let fused = fuse("TLID", &[&heat, &geometry]).unwrap();
        let missing = segments_without_data(&fused, &geometry).unwrap();

        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0]["TLID"], json!(null));
    }
}
