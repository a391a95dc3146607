#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fuses the street segment sources into one record per segment.
//!
//! ## Strategy
//!
//! | Step | What happens |
//! |------|--------------|
//! | [`plan::FusionPlan`] | Every column is assigned to the earliest source declaring it |
//! | [`merge::fuse`] | Sources are left-joined in order on the shared key, each contributing only the columns it owns |
//! | [`segment::project_segments`] | Fused rows are projected into typed [`street_heat_segment_models::Segment`] values |
//! | [`no_data`] | Rows of a source (street geometry) with no fused counterpart |
//!
//! Ownership is decided from the declared schemas before any row is read,
//! so a later source can never overwrite an earlier source's column.

pub mod merge;
pub mod no_data;
pub mod plan;
pub mod segment;

use street_heat_segment_models::SegmentId;
use thiserror::Error;

pub use merge::{FusedRow, FusedTable, fuse};
pub use plan::FusionPlan;

/// Errors that can occur during fusion.
#[derive(Debug, Error)]
pub enum FusionError {
    /// No sources were given.
    #[error("Fusion requires at least one source")]
    NoSources,

    /// A source does not declare the join key.
    #[error("Source '{source_name}' is missing join key column '{key}'")]
    MissingJoinKey {
        /// Name of the offending source.
        source_name: String,
        /// Join key column name.
        key: String,
    },

    /// A source row has no usable join key value.
    #[error("Source '{source_name}' row {row} has no integer '{key}' value")]
    InvalidKey {
        /// Name of the offending source.
        source_name: String,
        /// Zero-based row index within the source.
        row: usize,
        /// Join key column name.
        key: String,
    },

    /// A column needed for projection is owned by no source.
    #[error("No source provides column '{column}'")]
    MissingColumn {
        /// Column name.
        column: String,
    },

    /// A required value is null for a segment.
    #[error("Segment {segment_id} has no value for '{column}'")]
    MissingValue {
        /// Segment identifier.
        segment_id: SegmentId,
        /// Column name.
        column: String,
    },

    /// A geometry cell could not be converted.
    #[error("Segment {segment_id} has an invalid geometry: {message}")]
    Geometry {
        /// Segment identifier.
        segment_id: SegmentId,
        /// Description of what went wrong.
        message: String,
    },
}
