//! The individual phrases a composed text is built from.
//!
//! Each function covers one slot of the sentence and is pure, so every
//! branch can be checked on its own.

use street_heat_address::extract_range;
use street_heat_segment_models::SegmentId;

use crate::ComposeError;
use crate::zoning::ZoningTable;

/// Phrase used in place of a house-number range when a segment has no
/// parcels.
pub const NO_PARCELS_PHRASE: &str = "This segment of";

/// Name used when a segment has no street name.
pub const NO_NAME_PHRASE: &str = "This";

/// Location used when a segment crosses no named area.
pub const NO_LOCATION_PHRASE: &str = "in Boston";

/// Compares a segment's heat with the mean.
///
/// A difference of exactly zero reads as cooler.
#[must_use]
pub fn comparison_phrase(heat: f64, mean: f64) -> String {
    let delta = heat - mean;
    if delta > 0.0 {
        format!("{delta:.2}°F hotter than average")
    } else {
        format!("{:.2}°F cooler than average", delta.abs())
    }
}

/// House-number range of the segment's parcels, or [`NO_PARCELS_PHRASE`].
#[must_use]
pub fn house_number_phrase(addresses: &[String]) -> String {
    if addresses.is_empty() {
        NO_PARCELS_PHRASE.to_string()
    } else {
        extract_range(addresses)
    }
}

/// Street name, or [`NO_NAME_PHRASE`] when absent.
#[must_use]
pub fn street_name_phrase(name: Option<&str>) -> &str {
    name.unwrap_or(NO_NAME_PHRASE)
}

/// Where the segment lies, from the names of the areas it crosses.
///
/// Only the first two names are used when a segment crosses more.
#[must_use]
pub fn location_phrase(names: &[String]) -> String {
    match names {
        [] => NO_LOCATION_PHRASE.to_string(),
        [only] => format!("located in the {only} neighborhood"),
        [first, second, ..] => format!("that stretches from {first} to {second}"),
    }
}

/// `"parcel"` or `"parcels"`.
#[must_use]
pub const fn parcel_noun(count: usize) -> &'static str {
    if count == 1 { "parcel" } else { "parcels" }
}

/// Zoning clause appended after the parcel count.
///
/// # Errors
///
/// Returns [`ComposeError::UnknownZoningCluster`] if the segment has
/// parcels but its cluster code is missing or not in `table`.
pub fn zoning_clause(
    segment_id: SegmentId,
    parcel_count: usize,
    cluster: Option<i64>,
    table: &ZoningTable,
) -> Result<String, ComposeError> {
    if parcel_count == 0 {
        return Ok(String::new());
    }

    let label = cluster
        .and_then(|code| table.label(code))
        .ok_or(ComposeError::UnknownZoningCluster {
            segment_id,
            cluster,
            parcel_count,
        })?;

    Ok(if parcel_count == 1 {
        format!(" which is {label}")
    } else {
        format!(", mostly {label}")
    })
}

/// Collapses every run of whitespace into a single space and trims.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
