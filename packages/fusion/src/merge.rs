//! Ordered left-join of the planned sources.
//!
//! The first source drives the result: one fused row per distinct key, in
//! first-source order. Each later source is indexed by key and contributes
//! its owned columns; rows it does not cover get explicit nulls.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use street_heat_segment_models::SegmentId;
use street_heat_source::{Row, SourceTable, is_null_cell, segment_id_from_value};

use crate::{FusionError, FusionPlan};

/// One fused segment row. Every fused column is present; cells with no
/// source value are [`Value::Null`].
#[derive(Debug, Clone, PartialEq)]
pub struct FusedRow {
    id: SegmentId,
    values: Row,
}

impl FusedRow {
    /// Segment identifier.
    #[must_use]
    pub const fn id(&self) -> SegmentId {
        self.id
    }

    /// Cell for `column`; `None` if the column is not part of the fused
    /// schema.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Non-null cell for `column`.
    #[must_use]
    pub fn non_null(&self, column: &str) -> Option<&Value> {
        self.get(column).filter(|v| !v.is_null())
    }

    /// All cells keyed by column.
    #[must_use]
    pub const fn values(&self) -> &Row {
        &self.values
    }
}

/// The fused table: one row per segment of the driving source.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedTable {
    key: String,
    columns: Vec<String>,
    rows: Vec<FusedRow>,
    ids: BTreeSet<SegmentId>,
}

impl FusedTable {
    /// Join key column.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Fused columns, key first. No name appears twice.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Fused rows in driving-source order.
    #[must_use]
    pub fn rows(&self) -> &[FusedRow] {
        &self.rows
    }

    /// Number of fused rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows were fused.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a segment is present in the fused result.
    #[must_use]
    pub fn contains(&self, id: SegmentId) -> bool {
        self.ids.contains(&id)
    }

    /// Whether `column` is part of the fused schema.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Left-joins `sources` in order on `key`.
///
/// The result has exactly one row per distinct key of the first source.
/// Duplicate keys within any source keep their first row; later duplicates
/// are logged and ignored.
///
/// # Errors
///
/// Returns [`FusionError`] if `sources` is empty, a source lacks the key
/// column, a driving row has no key, or a non-null key is not an integer.
/// Rows of later sources with a null key are left unmatched.
pub fn fuse(key: &str, sources: &[&SourceTable]) -> Result<FusedTable, FusionError> {
    let plan = FusionPlan::new(key, sources)?;
    let Some((driving, rest)) = sources.split_first() else {
        return Err(FusionError::NoSources);
    };

    log::info!(
        "Fusing {} source(s) on '{key}', driven by '{}' ({} rows)",
        sources.len(),
        driving.name(),
        driving.len()
    );

    let mut ids = BTreeSet::new();
    let mut rows = Vec::with_capacity(driving.len());
    let mut duplicates = 0usize;

    for (index, row) in driving.rows().iter().enumerate() {
        let id = row_key(driving, index, row, key)?
            .ok_or_else(|| invalid_key(driving, index, key))?;
        if !ids.insert(id) {
            duplicates += 1;
            continue;
        }

        let mut values = Row::new();
        values.insert(key.to_string(), Value::from(id.value()));
        for column in plan.owned_columns(0) {
            values.insert(column.clone(), row.get(column).cloned().unwrap_or(Value::Null));
        }
        rows.push(FusedRow { id, values });
    }

    if duplicates > 0 {
        log::warn!(
            "[{}] Ignored {duplicates} row(s) with a duplicate '{key}'",
            driving.name()
        );
    }

    for (offset, source) in rest.iter().enumerate() {
        let owned = plan.owned_columns(offset + 1);
        let lookup = index_by_key(source, key)?;

        let mut matched = 0usize;
        for fused in &mut rows {
            let right = lookup.get(&fused.id);
            if right.is_some() {
                matched += 1;
            }
            for column in owned {
                let value = right
                    .and_then(|r| r.get(column))
                    .cloned()
                    .unwrap_or(Value::Null);
                fused.values.insert(column.clone(), value);
            }
        }

        log::info!(
            "[{}] Joined {} column(s); {matched}/{} fused rows matched",
            source.name(),
            owned.len(),
            rows.len()
        );
    }

    Ok(FusedTable {
        key: key.to_string(),
        columns: plan.columns(),
        rows,
        ids,
    })
}

/// Indexes a source's rows by key, first occurrence winning.
pub(crate) fn index_by_key<'a>(
    source: &'a SourceTable,
    key: &str,
) -> Result<BTreeMap<SegmentId, &'a Row>, FusionError> {
    let mut lookup = BTreeMap::new();
    let mut duplicates = 0usize;
    let mut keyless = 0usize;

    for (index, row) in source.rows().iter().enumerate() {
        let Some(id) = row_key(source, index, row, key)? else {
            keyless += 1;
            continue;
        };
        if lookup.contains_key(&id) {
            duplicates += 1;
        } else {
            lookup.insert(id, row);
        }
    }

    if duplicates > 0 {
        log::warn!(
            "[{}] Ignored {duplicates} row(s) with a duplicate '{key}'",
            source.name()
        );
    }
    warn_keyless(source, key, keyless);

    Ok(lookup)
}

fn warn_keyless(source: &SourceTable, key: &str, keyless: usize) {
    if keyless > 0 {
        log::warn!(
            "[{}] Left {keyless} row(s) without a '{key}' unmatched",
            source.name()
        );
    }
}

/// Reads the join key of one row. A null key reads as `None`; such rows
/// never match anything.
pub(crate) fn row_key(
    source: &SourceTable,
    index: usize,
    row: &Row,
    key: &str,
) -> Result<Option<SegmentId>, FusionError> {
    let cell = row.get(key);
    if is_null_cell(cell) {
        return Ok(None);
    }
    cell.and_then(segment_id_from_value)
        .map(Some)
        .ok_or_else(|| invalid_key(source, index, key))
}

fn invalid_key(source: &SourceTable, index: usize, key: &str) -> FusionError {
    FusionError::InvalidKey {
        source_name: source.name().to_string(),
        row: index,
        key: key.to_string(),
    }
}
