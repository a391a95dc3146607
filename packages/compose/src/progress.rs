//! Progress reporting for batch composition.
//!
//! [`ComposeProgress`] keeps this crate free of any rendering backend. The
//! binary plugs in an `indicatif` bar; tests and callers that do not care
//! use [`null_progress`].

use std::sync::Arc;

use street_heat_segment_models::SegmentId;

/// Receives updates while a batch of segments is composed.
///
/// Calls to [`composed`](Self::composed) arrive from rayon worker threads,
/// in no particular order.
pub trait ComposeProgress: Send + Sync {
    /// A batch of `segments` segments is about to be composed.
    fn start(&self, segments: usize);

    /// One segment composed within the limit, producing `chars` characters.
    fn composed(&self, segment_id: SegmentId, chars: usize);

    /// Every segment of the batch composed within the limit.
    fn finish(&self, composed: usize);
}

struct NullProgress;

impl ComposeProgress for NullProgress {
    fn start(&self, _segments: usize) {}
    fn composed(&self, _segment_id: SegmentId, _chars: usize) {}
    fn finish(&self, _composed: usize) {}
}

/// A [`ComposeProgress`] that ignores every update.
#[must_use]
pub fn null_progress() -> Arc<dyn ComposeProgress> {
    Arc::new(NullProgress)
}
