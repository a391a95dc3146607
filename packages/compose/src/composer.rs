//! Per-segment text composition.

use street_heat_address::extract_range;
use street_heat_neighborhood::NeighborhoodResolver;
use street_heat_segment_models::Segment;

use crate::ComposeError;
use crate::parcels::ParcelIndex;
use crate::phrases::{
    collapse_whitespace, comparison_phrase, house_number_phrase, location_phrase, parcel_noun,
    street_name_phrase, zoning_clause,
};
use crate::zoning::ZoningTable;

/// Composes the text for one segment from the shared reference data.
///
/// Holds only shared borrows, so one composer serves every rayon worker.
pub struct TweetComposer<'a> {
    parcels: &'a ParcelIndex,
    resolver: &'a NeighborhoodResolver,
    zoning: &'a ZoningTable,
}

impl<'a> TweetComposer<'a> {
    /// Creates a composer over the parcel, neighborhood and zoning lookups.
    #[must_use]
    pub const fn new(
        parcels: &'a ParcelIndex,
        resolver: &'a NeighborhoodResolver,
        zoning: &'a ZoningTable,
    ) -> Self {
        Self {
            parcels,
            resolver,
            zoning,
        }
    }

    /// Composes the whitespace-normalized text for `segment`.
    ///
    /// `fused_mean` is the mean heat over every fused segment. The result
    /// is never truncated; length checks happen in
    /// [`validate_batch`](crate::validate_batch).
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::UnknownZoningCluster`] if the segment has
    /// parcels but no known zoning label.
    pub fn compose(&self, segment: &Segment, fused_mean: f64) -> Result<String, ComposeError> {
        let addresses = self.parcels.addresses(segment.id);
        let parcel_count = addresses.len();

        let house_numbers = house_number_phrase(addresses);
        let street_name = street_name_phrase(segment.name.as_deref());
        let street_type = segment.kind();
        let location = location_phrase(&self.resolver.resolve(segment.geometry.as_ref()));
        let zoning = zoning_clause(segment.id, parcel_count, segment.zoning_cluster, self.zoning)?;
        let comparison = comparison_phrase(segment.heat, fused_mean);
        let heat = segment.heat;
        let noun = parcel_noun(parcel_count);

        let text = format!(
            "{house_numbers} {street_name} is a {street_type} {location}
            with {parcel_count} {noun}{zoning}. Its summer land surface temperature
            averaged {heat:.1}°F, {comparison}."
        );

        Ok(collapse_whitespace(&text))
    }

    /// House-number range of one segment's parcels, empty when none of
    /// them carries a number.
    #[must_use]
    pub fn address_range(&self, segment: &Segment) -> String {
        extract_range(self.parcels.addresses(segment.id))
    }
}

/// Mean heat over `segments`, or `0.0` for an empty batch.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_heat(segments: &[Segment]) -> f64 {
    if segments.is_empty() {
        return 0.0;
    }
    segments.iter().map(|s| s.heat).sum::<f64>() / segments.len() as f64
}
