//! Projection of fused rows into typed segments.

use serde_json::Value;
use street_heat_segment_models::{Segment, SegmentColumns, SegmentId};
use street_heat_source::{f64_from_value, i64_from_value};

use crate::{FusedRow, FusedTable, FusionError};

/// Projects every fused row into a [`Segment`].
///
/// # Errors
///
/// Returns [`FusionError::MissingColumn`] if a mapped column is not part of
/// the fused schema, [`FusionError::MissingValue`] if a segment has no heat
/// value, or [`FusionError::Geometry`] if a geometry cell cannot be
/// converted.
pub fn project_segments(
    table: &FusedTable,
    columns: &SegmentColumns,
) -> Result<Vec<Segment>, FusionError> {
    for column in [
        &columns.name,
        &columns.main_road,
        &columns.zoning_cluster,
        &columns.heat,
        &columns.geometry,
    ] {
        if !table.has_column(column) {
            return Err(FusionError::MissingColumn {
                column: column.clone(),
            });
        }
    }

    let segments = table
        .rows()
        .iter()
        .map(|row| project_segment(row, columns))
        .collect::<Result<Vec<_>, _>>()?;

    let without_geometry = segments.iter().filter(|s| s.geometry.is_none()).count();
    if without_geometry > 0 {
        log::warn!("{without_geometry} fused segment(s) have no geometry");
    }
    log::info!("Projected {} segments", segments.len());

    Ok(segments)
}

/// Projects one fused row.
///
/// # Errors
///
/// See [`project_segments`].
pub fn project_segment(row: &FusedRow, columns: &SegmentColumns) -> Result<Segment, FusionError> {
    let id = row.id();

    let heat = row
        .non_null(&columns.heat)
        .and_then(f64_from_value)
        .ok_or_else(|| FusionError::MissingValue {
            segment_id: id,
            column: columns.heat.clone(),
        })?;

    let name = row.non_null(&columns.name).and_then(|v| match v {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    let is_main_road = row.non_null(&columns.main_road).is_some_and(is_main_flag);

    let zoning_cluster = row.non_null(&columns.zoning_cluster).and_then(i64_from_value);

    let geometry = match row.non_null(&columns.geometry) {
        Some(value) => Some(parse_geometry(id, value)?),
        None => None,
    };

    Ok(Segment {
        id,
        name,
        is_main_road,
        zoning_cluster,
        heat,
        geometry,
    })
}

/// The main-road flag is the integer `1`; booleans are accepted too.
fn is_main_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        other => i64_from_value(other) == Some(1),
    }
}

fn parse_geometry(id: SegmentId, value: &Value) -> Result<geo::Geometry<f64>, FusionError> {
    let geometry: geojson::Geometry =
        serde_json::from_value(value.clone()).map_err(|e| FusionError::Geometry {
            segment_id: id,
            message: e.to_string(),
        })?;

    geometry.try_into().map_err(|e: geojson::Error| FusionError::Geometry {
        segment_id: id,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuse;
    use crate::merge::tests::table;
    use serde_json::json;

    fn fused() -> FusedTable {
        let heat = table(
            "urbanheat",
            &["TLID", "LST_weighted"],
            &[
                json!({ "TLID": 1, "LST_weighted": 95.25 }),
                json!({ "TLID": 2, "LST_weighted": 88.0 }),
            ],
        );
        let roads = table(
            "roads",
            &["TLID", "FULLNAM", "MAIN", "cluster"],
            &[json!({ "TLID": 1, "FULLNAM": "Tremont St", "MAIN": 1, "cluster": 3 })],
        );
        let geometry = table(
            "geometry",
            &["TLID", "geometry"],
            &[json!({
                "TLID": 1,
                "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 0.0]] }
            })],
        );
        fuse("TLID", &[&heat, &roads, &geometry]).unwrap()
    }

    #[test]
    fn projects_matched_row() {
        let segments = project_segments(&fused(), &SegmentColumns::default()).unwrap();
        let first = &segments[0];

        assert_eq!(first.id, SegmentId(1));
        assert_eq!(first.name.as_deref(), Some("Tremont St"));
        assert!(first.is_main_road);
        assert_eq!(first.zoning_cluster, Some(3));
        assert!((first.heat - 95.25).abs() < f64::EPSILON);
        assert!(matches!(first.geometry, Some(geo::Geometry::LineString(_))));
    }

    #[test]
    fn projects_unmatched_row_with_absent_attributes() {
        let segments = project_segments(&fused(), &SegmentColumns::default()).unwrap();
        let second = &segments[1];

        assert_eq!(second.id, SegmentId(2));
        assert_eq!(second.name, None);
        assert!(!second.is_main_road);
        assert_eq!(second.zoning_cluster, None);
        assert!(second.geometry.is_none());
    }

    #[test]
    fn missing_mapped_column_is_a_configuration_error() {
        let columns = SegmentColumns {
            name: "STREETNAME".to_string(),
            ..SegmentColumns::default()
        };
        assert!(matches!(
            project_segments(&fused(), &columns),
            Err(FusionError::MissingColumn { column }) if column == "STREETNAME"
        ));
    }

    #[test]
    fn main_flag_accepts_integer_one_only() {
        assert!(is_main_flag(&json!(1)));
        assert!(is_main_flag(&json!(1.0)));
        assert!(is_main_flag(&json!(true)));
        assert!(!is_main_flag(&json!(0)));
        assert!(!is_main_flag(&json!(2)));
        assert!(!is_main_flag(&json!("yes")));
    }
}
