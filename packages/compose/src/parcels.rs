//! Parcel addresses grouped by segment.

use std::collections::BTreeMap;

use street_heat_segment_models::{ParcelAddress, SegmentId};

/// Read-only lookup of the parcel addresses fronting each segment.
#[derive(Debug, Clone, Default)]
pub struct ParcelIndex {
    by_segment: BTreeMap<SegmentId, Vec<String>>,
}

impl ParcelIndex {
    /// Groups parcel addresses by segment, keeping input order within a
    /// segment.
    #[must_use]
    pub fn new(parcels: Vec<ParcelAddress>) -> Self {
        let mut by_segment: BTreeMap<SegmentId, Vec<String>> = BTreeMap::new();
        for parcel in parcels {
            by_segment
                .entry(parcel.segment_id)
                .or_default()
                .push(parcel.full_address);
        }

        log::debug!("Indexed parcels for {} segments", by_segment.len());
        Self { by_segment }
    }

    /// Addresses of the parcels on `segment_id`, empty if it has none.
    #[must_use]
    pub fn addresses(&self, segment_id: SegmentId) -> &[String] {
        self.by_segment
            .get(&segment_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of parcels on `segment_id`.
    #[must_use]
    pub fn count(&self, segment_id: SegmentId) -> usize {
        self.addresses(segment_id).len()
    }

    /// Number of segments with at least one parcel.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.by_segment.len()
    }
}
