//! Column ownership planning.
//!
//! A [`FusionPlan`] is computed from the declared columns of each source
//! only. Each column is owned by exactly one source: the earliest one that
//! declares it. The join key is owned by the first source.

use std::collections::BTreeMap;

use street_heat_source::SourceTable;

use crate::FusionError;

/// Which source owns which columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FusionPlan {
    key: String,
    /// Owned columns per source, in source order, excluding the key.
    owned: Vec<Vec<String>>,
    /// Column name -> owning source index (includes the key).
    owners: BTreeMap<String, usize>,
}

impl FusionPlan {
    /// Builds the ownership plan for `sources` joined on `key`.
    ///
    /// # Errors
    ///
    /// Returns [`FusionError::NoSources`] for an empty list, or
    /// [`FusionError::MissingJoinKey`] naming the first source that does
    /// not declare `key`.
    pub fn new(key: &str, sources: &[&SourceTable]) -> Result<Self, FusionError> {
        if sources.is_empty() {
            return Err(FusionError::NoSources);
        }

        for source in sources {
            if !source.has_column(key) {
                return Err(FusionError::MissingJoinKey {
                    source_name: source.name().to_string(),
                    key: key.to_string(),
                });
            }
        }

        let mut owners = BTreeMap::new();
        owners.insert(key.to_string(), 0);

        let mut owned = Vec::with_capacity(sources.len());
        for (index, source) in sources.iter().enumerate() {
            let mut columns = Vec::new();
            for column in source.columns() {
                if column == key {
                    continue;
                }
                if let Some(&owner) = owners.get(column) {
                    if owner != index {
                        log::debug!(
                            "Column '{column}' of '{}' is owned by an earlier source; dropping",
                            source.name()
                        );
                    }
                    continue;
                }
                owners.insert(column.clone(), index);
                columns.push(column.clone());
            }
            owned.push(columns);
        }

        Ok(Self {
            key: key.to_string(),
            owned,
            owners,
        })
    }

    /// The join key column.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Columns contributed by the source at `index` (never the key).
    #[must_use]
    pub fn owned_columns(&self, index: usize) -> &[String] {
        self.owned.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    /// Index of the source owning `column`, if any.
    #[must_use]
    pub fn owner_of(&self, column: &str) -> Option<usize> {
        self.owners.get(column).copied()
    }

    /// All fused columns: the key, then each source's owned columns in
    /// source order.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        std::iter::once(self.key.clone())
            .chain(self.owned.iter().flatten().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, columns: &[&str]) -> SourceTable {
        SourceTable::new(
            name,
            columns.iter().map(ToString::to_string).collect(),
            Vec::new(),
        )
    }

    #[test]
    fn earliest_source_owns_colliding_columns() {
        let heat = table("urbanheat", &["TLID", "LST_weighted", "cluster"]);
        let roads = table("roads", &["TLID", "FULLNAM", "cluster", "MAIN"]);
        let geometry = table("geometry", &["TLID", "FULLNAM", "geometry"]);

        let plan = FusionPlan::new("TLID", &[&heat, &roads, &geometry]).unwrap();

        assert_eq!(plan.owned_columns(0), ["LST_weighted", "cluster"]);
        assert_eq!(plan.owned_columns(1), ["FULLNAM", "MAIN"]);
        assert_eq!(plan.owned_columns(2), ["geometry"]);
        assert_eq!(plan.owner_of("cluster"), Some(0));
        assert_eq!(plan.owner_of("TLID"), Some(0));
        assert_eq!(plan.owner_of("missing"), None);
        assert_eq!(
            plan.columns(),
            ["TLID", "LST_weighted", "cluster", "FULLNAM", "MAIN", "geometry"]
        );
    }

    #[test]
    fn fused_columns_are_unique() {
        let a = table("a", &["TLID", "x", "y"]);
        let b = table("b", &["y", "TLID", "x", "z"]);
        let c = table("c", &["z", "TLID", "w"]);

        let columns = FusionPlan::new("TLID", &[&a, &b, &c]).unwrap().columns();
        let mut deduped = columns.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(columns.len(), deduped.len());
        assert_eq!(columns.len(), 5);
    }

    #[test]
    fn missing_join_key_names_the_source() {
        let a = table("urbanheat", &["TLID", "LST_weighted"]);
        let b = table("roads", &["tlid", "FULLNAM"]);

        let err = FusionPlan::new("TLID", &[&a, &b]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Source 'roads' is missing join key column 'TLID'"
        );
    }

    #[test]
    fn empty_source_list_is_rejected() {
        assert!(matches!(
            FusionPlan::new("TLID", &[]),
            Err(FusionError::NoSources)
        ));
    }
}
