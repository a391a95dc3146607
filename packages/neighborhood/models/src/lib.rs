#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighborhood layer definition types.
//!
//! Two polygon layers are used to name the area a street runs through: a
//! fine-grained section layer whose regions may carry an "Unnamed"
//! sentinel, and a coarse neighborhood layer used as the fallback.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Default sentinel name marking a section without a usable name.
pub const DEFAULT_UNNAMED: &str = "Unnamed";

/// A neighborhood polygon layer, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborhoodLayer {
    /// `GeoJSON` file holding the layer's polygons.
    pub path: String,
    /// Feature property containing the region name (e.g. `"Name"`).
    pub name_field: String,
    /// Name given to regions whose name property is missing or blank.
    /// Regions without a name are skipped when this is `None`.
    #[serde(default)]
    pub unnamed: Option<String>,
}

/// Which layer a resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum NeighborhoodTier {
    /// Fine-grained neighborhood sections.
    Section,
    /// Coarse neighborhood boundaries (fallback).
    Neighborhood,
}

/// The names a geometry resolved to, and the layer they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Layer the names were taken from.
    pub tier: NeighborhoodTier,
    /// Intersecting region names in layer order, one per region.
    pub names: Vec<String>,
}
