#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Composition of short descriptive texts for street segments.
//!
//! Each fused [`Segment`](street_heat_segment_models::Segment) is turned
//! into one sentence describing its house-number range, the neighborhoods
//! it crosses, its parcels and zoning, and how its summer surface
//! temperature compares with the city-wide mean. A batch is composed in
//! parallel and validated against a character limit before anything is
//! written.

pub mod composer;
pub mod output;
pub mod parcels;
pub mod phrases;
pub mod progress;
pub mod validate;
pub mod zoning;

use street_heat_segment_models::SegmentId;
use thiserror::Error;

pub use composer::{TweetComposer, mean_heat};
pub use parcels::ParcelIndex;
pub use progress::ComposeProgress;
pub use validate::validate_batch;
pub use zoning::ZoningTable;

/// Errors that can occur while composing or writing texts.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A segment with parcels has no known zoning label.
    #[error("Segment {segment_id} has {parcel_count} parcel(s) but unknown zoning cluster {cluster:?}")]
    UnknownZoningCluster {
        /// Offending segment.
        segment_id: SegmentId,
        /// Cluster code found on the segment, if any.
        cluster: Option<i64>,
        /// Number of parcels on the segment.
        parcel_count: usize,
    },

    /// Output file could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors that fail a whole composition batch.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A segment could not be composed.
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// A composed text exceeds the character limit.
    #[error("Text for segment {segment_id} is {length} characters, over the limit of {limit}: {text}")]
    TooLong {
        /// Offending segment.
        segment_id: SegmentId,
        /// Length of the text in characters.
        length: usize,
        /// Configured limit.
        limit: usize,
        /// The offending text.
        text: String,
    },
}
