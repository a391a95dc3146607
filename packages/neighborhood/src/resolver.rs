//! Two-tier neighborhood resolution.
//!
//! Sections are tried first. When any intersecting section carries the
//! "unnamed" sentinel, the whole answer comes from the coarse neighborhood
//! layer instead, so the two layers are never mixed.

use std::path::Path;

use street_heat_neighborhood_models::{
    DEFAULT_UNNAMED, NeighborhoodLayer, NeighborhoodTier, Resolution,
};

use crate::NeighborhoodError;
use crate::index::LayerIndex;
use crate::ingest::load_layer;

/// Resolves street geometries to the names of the areas they cross.
pub struct NeighborhoodResolver {
    sections: LayerIndex,
    neighborhoods: LayerIndex,
    unnamed: String,
}

impl NeighborhoodResolver {
    /// Creates a resolver from prebuilt indexes.
    #[must_use]
    pub fn new(sections: LayerIndex, neighborhoods: LayerIndex, unnamed: impl Into<String>) -> Self {
        Self {
            sections,
            neighborhoods,
            unnamed: unnamed.into(),
        }
    }

    /// Loads both layers from disk.
    ///
    /// The sentinel is taken from the section layer's `unnamed` setting,
    /// defaulting to [`DEFAULT_UNNAMED`].
    ///
    /// # Errors
    ///
    /// Returns [`NeighborhoodError`] if either layer fails to load.
    pub fn load(
        base_dir: &Path,
        sections: &NeighborhoodLayer,
        neighborhoods: &NeighborhoodLayer,
    ) -> Result<Self, NeighborhoodError> {
        let unnamed = sections
            .unnamed
            .clone()
            .unwrap_or_else(|| DEFAULT_UNNAMED.to_string());

        Ok(Self::new(
            load_layer(base_dir, sections)?,
            load_layer(base_dir, neighborhoods)?,
            unnamed,
        ))
    }

    /// Names of the areas `geometry` crosses, in layer order.
    ///
    /// A missing geometry resolves to no names.
    #[must_use]
    pub fn resolve(&self, geometry: Option<&geo::Geometry<f64>>) -> Vec<String> {
        self.resolve_detailed(geometry).names
    }

    /// Like [`Self::resolve`], also reporting which layer answered.
    #[must_use]
    pub fn resolve_detailed(&self, geometry: Option<&geo::Geometry<f64>>) -> Resolution {
        let Some(geometry) = geometry else {
            return Resolution {
                tier: NeighborhoodTier::Section,
                names: Vec::new(),
            };
        };

        let names = self.sections.intersecting_names(geometry);
        if !names.iter().any(|name| *name == self.unnamed) {
            return Resolution {
                tier: NeighborhoodTier::Section,
                names,
            };
        }

        log::trace!("Section result {names:?} has an unnamed region; using neighborhoods");
        Resolution {
            tier: NeighborhoodTier::Neighborhood,
            names: self.neighborhoods.intersecting_names(geometry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NamedBoundary;
    use geo::{Geometry, LineString, MultiPolygon, Polygon, polygon};

    fn rect(name: &str, x0: f64, x1: f64) -> NamedBoundary {
        let p: Polygon<f64> = polygon![
            (x: x0, y: 0.0),
            (x: x1, y: 0.0),
            (x: x1, y: 1.0),
            (x: x0, y: 1.0),
            (x: x0, y: 0.0),
        ];
        NamedBoundary {
            name: name.to_string(),
            polygon: MultiPolygon(vec![p]),
        }
    }

    fn resolver() -> NeighborhoodResolver {
        let sections = LayerIndex::new(vec![
            rect("Bay Village", 0.0, 1.0),
            rect("Kenmore", 1.0, 2.0),
            rect("Unnamed", 2.0, 3.0),
        ]);
        let neighborhoods = LayerIndex::new(vec![
            rect("Back Bay", 0.0, 1.5),
            rect("Fenway", 1.5, 3.0),
        ]);
        NeighborhoodResolver::new(sections, neighborhoods, DEFAULT_UNNAMED)
    }

    fn line(x0: f64, x1: f64) -> Geometry<f64> {
        Geometry::LineString(LineString::from(vec![(x0, 0.5), (x1, 0.5)]))
    }

    #[test]
    fn named_sections_are_used_directly() {
        let resolution = resolver().resolve_detailed(Some(&line(0.2, 1.8)));
        assert_eq!(resolution.tier, NeighborhoodTier::Section);
        assert_eq!(resolution.names, ["Bay Village", "Kenmore"]);
    }

    #[test]
    fn unnamed_section_falls_back_to_neighborhoods_without_mixing() {
        let resolution = resolver().resolve_detailed(Some(&line(1.2, 2.5)));
        assert_eq!(resolution.tier, NeighborhoodTier::Neighborhood);
        assert_eq!(resolution.names, ["Back Bay", "Fenway"]);
    }

    #[test]
    fn only_unnamed_section_falls_back() {
        assert_eq!(resolver().resolve(Some(&line(2.2, 2.8))), ["Fenway"]);
    }

    #[test]
    fn outside_every_region_resolves_to_nothing() {
        assert!(resolver().resolve(Some(&line(5.0, 6.0))).is_empty());
    }

    #[test]
    fn missing_geometry_resolves_to_nothing() {
        assert!(resolver().resolve(None).is_empty());
    }
}
