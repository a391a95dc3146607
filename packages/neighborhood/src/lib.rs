#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighborhood name resolution for street segments.
//!
//! Loads the section and neighborhood polygon layers from `GeoJSON`,
//! builds an R-tree per layer, and answers "which named areas does this
//! street run through" with a fallback from sections to neighborhoods.

pub mod index;
pub mod ingest;
pub mod normalize;
pub mod resolver;

use thiserror::Error;

pub use index::LayerIndex;
pub use resolver::NeighborhoodResolver;

/// Errors that can occur during neighborhood operations.
#[derive(Debug, Error)]
pub enum NeighborhoodError {
    /// Layer file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Data conversion or normalization error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
