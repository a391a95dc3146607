#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street segment types shared across the street heat pipeline.
//!
//! A [`Segment`] is the fused, read-only view of one street segment after
//! every input source has been merged on its identifier. Parcel addresses
//! are kept separately as reference data, and each run produces one
//! [`ComposedText`] per segment.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Stable integer identifier of a street segment (the shared join key of
/// every input source).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SegmentId(pub i64);

impl SegmentId {
    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SegmentId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Whether a segment is flagged as a main road.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum StreetKind {
    /// A regular street.
    #[strum(serialize = "street")]
    Street,
    /// A segment flagged as a main road.
    #[strum(serialize = "main street")]
    MainStreet,
}

impl StreetKind {
    /// Maps the main-road flag to a street kind.
    #[must_use]
    pub const fn from_main_road(is_main_road: bool) -> Self {
        if is_main_road {
            Self::MainStreet
        } else {
            Self::Street
        }
    }
}

/// One fused street segment.
///
/// Immutable once produced by fusion. Every attribute other than the
/// identifier and the heat value may be absent when the source that owns
/// it had no row for this segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Segment identifier.
    pub id: SegmentId,
    /// Display name of the street (e.g. "Tremont St").
    pub name: Option<String>,
    /// Whether the segment is a main road.
    pub is_main_road: bool,
    /// Zoning cluster code of the segment's dominant parcel usage.
    pub zoning_cluster: Option<i64>,
    /// Denormalized heat value in degrees Fahrenheit.
    pub heat: f64,
    /// Street polyline, when the geometry source has a row for the segment.
    pub geometry: Option<geo::Geometry<f64>>,
}

impl Segment {
    /// Returns whether this segment is a regular or a main street.
    #[must_use]
    pub const fn kind(&self) -> StreetKind {
        StreetKind::from_main_road(self.is_main_road)
    }
}

/// A land parcel address attached to a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParcelAddress {
    /// Segment the parcel fronts on.
    pub segment_id: SegmentId,
    /// Free-form address (e.g. `"10-12 Tremont St 02116"`).
    pub full_address: String,
}

/// The final text produced for one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedText {
    /// Segment the text describes.
    pub segment_id: SegmentId,
    /// Whitespace-normalized text.
    #[serde(rename = "tweet")]
    pub text: String,
}

impl ComposedText {
    /// Length of the text in characters (Unicode scalar values).
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Column names used to project a fused row into a [`Segment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentColumns {
    /// Street display name column.
    pub name: String,
    /// Main road flag column (`1` means main road).
    pub main_road: String,
    /// Zoning cluster code column.
    pub zoning_cluster: String,
    /// Denormalized heat value column.
    pub heat: String,
    /// GeoJSON geometry column.
    pub geometry: String,
}

impl Default for SegmentColumns {
    fn default() -> Self {
        Self {
            name: "FULLNAM".to_string(),
            main_road: "MAIN".to_string(),
            zoning_cluster: "cluster".to_string(),
            heat: "LST_weighted".to_string(),
            geometry: "geometry".to_string(),
        }
    }
}
