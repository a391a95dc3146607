#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Input loading for the street heat pipeline.
//!
//! Every input (heat values, street attributes, parcel addresses, street
//! geometry) is loaded once into a [`SourceTable`]: a named, column-ordered
//! list of rows, each row a JSON object keyed by column name. Keeping rows
//! untyped at this stage lets fusion reason about column ownership before
//! anything is projected into typed [`street_heat_segment_models::Segment`]
//! values.

pub mod csv_table;
pub mod denormalize;
pub mod geojson_table;
pub mod parcels;

use serde_json::Value;
use street_heat_segment_models::SegmentId;

/// A single source row keyed by column name.
pub type Row = serde_json::Map<String, Value>;

/// Errors that can occur while loading input sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON conversion failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// A required column is not present in a source.
    #[error("Source '{source_name}' has no column '{column}'")]
    MissingColumn {
        /// Name of the source.
        source_name: String,
        /// Column that was expected.
        column: String,
    },

    /// Data conversion or normalization error.
    #[error("Normalization error: {message}")]
    Normalization {
        /// Description of what went wrong.
        message: String,
    },
}

/// A loaded input source: ordered columns plus rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl SourceTable {
    /// Creates a table from its parts.
    ///
    /// Cells missing from a row are treated as null by every consumer.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Human-readable source name used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in load order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Mutable access to the rows (used by load-time transforms).
    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the table declares `column`.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Returns an error unless the table declares `column`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingColumn`] if the column is absent.
    pub fn require_column(&self, column: &str) -> Result<(), SourceError> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(SourceError::MissingColumn {
                source_name: self.name.clone(),
                column: column.to_string(),
            })
        }
    }
}

/// Whether a cell is absent or null. Blank CSV cells load as null.
#[must_use]
pub const fn is_null_cell(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Interprets a cell as a segment identifier.
///
/// See [`i64_from_value`] for the accepted representations.
#[must_use]
pub fn segment_id_from_value(value: &Value) -> Option<SegmentId> {
    i64_from_value(value).map(SegmentId)
}

/// Interprets a cell as an integer.
///
/// Accepts integers, floats without a fractional part (CSV exports often
/// write `123.0`) and numeric strings. Returns `None` for anything else.
#[must_use]
pub fn i64_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .and_then(float_to_i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0)
                    .and_then(float_to_i64)
            })
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_to_i64(f: f64) -> Option<i64> {
    (f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
}

/// Interprets a cell as a float. Numeric strings are accepted.
#[must_use]
pub fn f64_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}
