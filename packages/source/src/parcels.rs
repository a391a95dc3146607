//! Parcel address extraction.
//!
//! Parcels are reference data, not a fusion source: a segment may have any
//! number of them, and only their addresses and count matter downstream.

use street_heat_segment_models::ParcelAddress;

use crate::{SourceError, SourceTable, is_null_cell, segment_id_from_value};

/// Extracts `(segment_id, full_address)` pairs from a parcel table.
///
/// Rows with a null key belong to no segment and are skipped. Rows with a
/// null address are kept with an empty address: they count as parcels but
/// contribute no house number.
///
/// # Errors
///
/// Returns [`SourceError`] if either column is missing or a non-null key
/// is not an integer.
pub fn parcel_addresses(
    table: &SourceTable,
    key_column: &str,
    address_column: &str,
) -> Result<Vec<ParcelAddress>, SourceError> {
    table.require_column(key_column)?;
    table.require_column(address_column)?;

    let mut parcels = Vec::with_capacity(table.len());
    let mut blank_addresses = 0usize;
    let mut unassigned = 0usize;

    for (index, row) in table.rows().iter().enumerate() {
        let cell = row.get(key_column);
        if is_null_cell(cell) {
            unassigned += 1;
            continue;
        }
        let segment_id = cell
            .and_then(segment_id_from_value)
            .ok_or_else(|| SourceError::Normalization {
                message: format!(
                    "[{}] row {index} has a non-integer '{key_column}'",
                    table.name()
                ),
            })?;

        let full_address = match row.get(address_column) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => {
                blank_addresses += 1;
                String::new()
            }
        };

        parcels.push(ParcelAddress {
            segment_id,
            full_address,
        });
    }

    if unassigned > 0 {
        log::warn!(
            "[{}] Skipped {unassigned} parcel(s) without a '{key_column}'",
            table.name()
        );
    }
    if blank_addresses > 0 {
        log::debug!(
            "[{}] {blank_addresses} parcel(s) have no address; they still count",
            table.name()
        );
    }
    log::info!("[{}] Loaded {} parcel addresses", table.name(), parcels.len());

    Ok(parcels)
}
