//! In-memory R-tree index over one polygon layer.

use geo::{BoundingRect, Intersects, MultiPolygon, Rect};
use rstar::{AABB, RTree, RTreeObject};

use crate::normalize::NamedBoundary;

/// A boundary polygon stored in the R-tree with its layer position.
struct BoundaryEntry {
    ordinal: usize,
    name: String,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for BoundaryEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Spatial index over the regions of a single layer.
///
/// Regions remember their position in the source file so that query
/// results come back in layer order regardless of tree layout.
pub struct LayerIndex {
    tree: RTree<BoundaryEntry>,
}

impl LayerIndex {
    /// Builds the index from normalized boundaries, in layer order.
    #[must_use]
    pub fn new(boundaries: Vec<NamedBoundary>) -> Self {
        let entries: Vec<BoundaryEntry> = boundaries
            .into_iter()
            .enumerate()
            .filter_map(|(ordinal, boundary)| {
                let Some(envelope) = compute_envelope(&boundary.polygon) else {
                    log::warn!("Skipping empty polygon for region '{}'", boundary.name);
                    return None;
                };
                Some(BoundaryEntry {
                    ordinal,
                    name: boundary.name,
                    envelope,
                    polygon: boundary.polygon,
                })
            })
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index holds no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Names of every region that `geometry` intersects, in layer order.
    /// A name is repeated once per intersecting region that carries it.
    #[must_use]
    pub fn intersecting_names(&self, geometry: &geo::Geometry<f64>) -> Vec<String> {
        let Some(rect) = geometry.bounding_rect() else {
            return Vec::new();
        };
        let query_env = rect_envelope(rect);

        let mut hits: Vec<&BoundaryEntry> = self
            .tree
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| geometry.intersects(&entry.polygon))
            .collect();
        hits.sort_by_key(|entry| entry.ordinal);

        hits.into_iter().map(|entry| entry.name.clone()).collect()
    }
}

/// Computes the axis-aligned bounding box of a multi-polygon.
fn compute_envelope(mp: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    mp.bounding_rect().map(rect_envelope)
}

fn rect_envelope(rect: Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Geometry, LineString, Point, Polygon, polygon};

    fn square(name: &str, x: f64, y: f64) -> NamedBoundary {
        let p: Polygon<f64> = polygon![
            (x: x, y: y),
            (x: x + 1.0, y: y),
            (x: x + 1.0, y: y + 1.0),
            (x: x, y: y + 1.0),
            (x: x, y: y),
        ];
        NamedBoundary {
            name: name.to_string(),
            polygon: MultiPolygon(vec![p]),
        }
    }

    fn line(coords: &[(f64, f64)]) -> Geometry<f64> {
        Geometry::LineString(LineString::from(coords.to_vec()))
    }

    fn index() -> LayerIndex {
        LayerIndex::new(vec![
            square("Alpha", 0.0, 0.0),
            square("Beta", 1.0, 0.0),
            square("Gamma", 2.0, 0.0),
            square("Beta", 3.0, 0.0),
        ])
    }

    #[test]
    fn finds_single_region() {
        let names = index().intersecting_names(&line(&[(0.2, 0.5), (0.8, 0.5)]));
        assert_eq!(names, ["Alpha"]);
    }

    #[test]
    fn results_follow_layer_order() {
        let names = index().intersecting_names(&line(&[(2.5, 0.5), (0.5, 0.5)]));
        assert_eq!(names, ["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn repeated_names_are_kept() {
        let names = index().intersecting_names(&line(&[(1.5, 0.5), (3.5, 0.5)]));
        assert_eq!(names, ["Beta", "Gamma", "Beta"]);
    }

    #[test]
    fn adjacent_regions_with_one_name() {
        let index = LayerIndex::new(vec![
            square("Roxbury", 0.0, 0.0),
            square("Roxbury", 1.0, 0.0),
        ]);
        let names = index.intersecting_names(&line(&[(0.5, 0.5), (1.5, 0.5)]));
        assert_eq!(names, ["Roxbury", "Roxbury"]);
    }

    #[test]
    fn disjoint_geometry_is_not_a_hit() {
        let names = index().intersecting_names(&line(&[(-1.0, 0.5), (-0.5, 2.0)]));
        assert!(names.is_empty());
    }

    #[test]
    fn points_resolve_too() {
        let names = index().intersecting_names(&Geometry::Point(Point::new(2.5, 0.5)));
        assert_eq!(names, ["Gamma"]);
    }

    #[test]
    fn empty_index_yields_nothing() {
        let empty = LayerIndex::new(Vec::new());
        assert!(empty.is_empty());
        assert!(empty.intersecting_names(&line(&[(0.0, 0.0), (1.0, 1.0)])).is_empty());
    }
}
