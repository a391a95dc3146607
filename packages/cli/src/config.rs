//! Pipeline configuration loaded from TOML.
//!
//! The default configuration is baked into the binary at compile time via
//! [`include_str!`]; `--config` replaces it with a file on disk.

use std::path::Path;

use serde::{Deserialize, Serialize};
use street_heat_compose::zoning::{ZoningEntry, ZoningTable};
use street_heat_neighborhood_models::NeighborhoodLayer;
use street_heat_segment_models::SegmentColumns;
use street_heat_source::denormalize::Denormalization;

/// Default configuration, embedded at compile time.
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Top-level pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Column shared by every segment source.
    pub join_key: String,
    /// Maximum composed text length, in characters.
    pub char_limit: usize,
    /// Input file names.
    pub inputs: InputFiles,
    /// Heat columns and their denormalization.
    pub heat: HeatConfig,
    /// Column mapping.
    pub columns: ColumnConfig,
    /// Fine-grained neighborhood sections, checked first.
    pub sections: NeighborhoodLayer,
    /// Coarse neighborhoods, used when a section is unnamed.
    pub neighborhoods: NeighborhoodLayer,
    /// Zoning cluster labels; empty means the built-in table.
    pub zoning: Vec<ZoningEntry>,
    /// Output files and shuffle seed.
    pub output: OutputConfig,
}

/// Input file names, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFiles {
    /// Modeled heat values (CSV).
    pub heat: String,
    /// Street attributes (CSV).
    pub attributes: String,
    /// Street geometry (`GeoJSON`).
    pub roads: String,
    /// Land parcel addresses (CSV).
    pub parcels: String,
}

/// Heat columns to denormalize on load, and the transform to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatConfig {
    /// Columns of the heat source holding normalized values.
    pub columns: Vec<String>,
    /// `scale` and `offset`, read from the same table.
    #[serde(flatten)]
    pub denormalization: Denormalization,
}

/// Column mapping for segment projection and parcel addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Columns projected into each segment.
    #[serde(flatten)]
    pub segment: SegmentColumns,
    /// Parcel table column holding the free-form address.
    pub full_address: String,
}

/// Where results are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Composed text CSV, relative to the working directory.
    pub file: String,
    /// Seed for a reproducible shuffle.
    #[serde(default)]
    pub seed: Option<u64>,
    /// `GeoJSON` file for segments with no data.
    #[serde(default)]
    pub no_data: Option<String>,
}

impl PipelineConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or does not match
    /// the configuration schema.
    pub fn parse(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::de::from_str(toml_str)
    }

    /// Loads the configuration from `path`, or the embedded default when
    /// no path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let Some(path) = path else {
            return Ok(Self::parse(DEFAULT_CONFIG)?);
        };

        log::info!("Loading configuration from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(&contents)?)
    }

    /// Zoning labels, falling back to the built-in table when the
    /// configuration lists none.
    #[must_use]
    pub fn zoning_table(&self) -> ZoningTable {
        if self.zoning.is_empty() {
            ZoningTable::default()
        } else {
            ZoningTable::from_entries(&self.zoning)
        }
    }
}
