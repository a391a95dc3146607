//! Zoning cluster labels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One cluster code and its label, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoningEntry {
    /// Integer cluster code.
    pub cluster: i64,
    /// Human-readable label (e.g. `"residential"`).
    pub label: String,
}

/// Maps zoning cluster codes to labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoningTable {
    labels: BTreeMap<i64, String>,
}

const DEFAULT_LABELS: [(i64, &str); 7] = [
    (0, "residential"),
    (1, "multi-family residential"),
    (2, "commercial"),
    (3, "mixed-use commercial"),
    (4, "tax-exempt"),
    (5, "industrial"),
    (6, "condominium residential"),
];

impl Default for ZoningTable {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS
                .iter()
                .map(|(cluster, label)| (*cluster, (*label).to_string()))
                .collect(),
        }
    }
}

impl ZoningTable {
    /// Builds a table from configuration entries. Later entries replace
    /// earlier ones with the same code.
    #[must_use]
    pub fn from_entries(entries: &[ZoningEntry]) -> Self {
        Self {
            labels: entries
                .iter()
                .map(|entry| (entry.cluster, entry.label.clone()))
                .collect(),
        }
    }

    /// Label for a cluster code.
    #[must_use]
    pub fn label(&self, cluster: i64) -> Option<&str> {
        self.labels.get(&cluster).map(String::as_str)
    }

    /// Number of known clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the table has no clusters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
