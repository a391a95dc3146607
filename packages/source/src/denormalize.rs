//! Heat value denormalization.
//!
//! The modeled land surface temperatures ship normalized; the real value in
//! degrees Fahrenheit is `value * scale + offset`. The transform is applied
//! in place to every configured column right after loading, so nothing
//! downstream ever sees normalized values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{SourceError, SourceTable, f64_from_value};

/// Affine transform from normalized to real heat values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Denormalization {
    /// Multiplier applied to the normalized value.
    pub scale: f64,
    /// Offset added after scaling.
    pub offset: f64,
}

impl Default for Denormalization {
    fn default() -> Self {
        Self {
            scale: 44.0,
            offset: 72.4,
        }
    }
}

impl Denormalization {
    /// Converts one normalized value. Multiply and add round separately,
    /// matching the published values.
    #[must_use]
    #[allow(clippy::suboptimal_flops)]
    pub fn apply(&self, normalized: f64) -> f64 {
        normalized * self.scale + self.offset
    }

    /// Denormalizes `columns` of `table` in place. Null cells stay null.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingColumn`] if a column does not exist, or
    /// [`SourceError::Normalization`] if a non-null cell is not numeric.
    pub fn apply_to_columns(
        &self,
        table: &mut SourceTable,
        columns: &[String],
    ) -> Result<(), SourceError> {
        for column in columns {
            table.require_column(column)?;
        }

        let name = table.name().to_string();
        for row in table.rows_mut() {
            for column in columns {
                let Some(cell) = row.get_mut(column) else {
                    continue;
                };
                if cell.is_null() {
                    continue;
                }
                let normalized = f64_from_value(cell).ok_or_else(|| SourceError::Normalization {
                    message: format!("[{name}] non-numeric value {cell} in heat column '{column}'"),
                })?;
                *cell = serde_json::Number::from_f64(self.apply(normalized))
                    .map_or(Value::Null, Value::Number);
            }
        }

        log::info!(
            "[{name}] Denormalized {} column(s) with value * {} + {}",
            columns.len(),
            self.scale,
            self.offset
        );

        Ok(())
    }
}
