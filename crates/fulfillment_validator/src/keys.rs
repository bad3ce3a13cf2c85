//! Primary-key projection shared by the base validator and the enforcer.

use fulfillment_core::{CellKey, Row, Table};
use std::collections::HashSet;

/// Null and duplicate counts of a key over a table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeyStats {
    pub null_rows: usize,
    pub duplicates: usize,
}

/// Resolves key column names to indices. Callers check presence first.
pub(crate) fn key_indices(table: &Table, key: &[String]) -> Vec<usize> {
    key.iter().filter_map(|c| table.column_index(c)).collect()
}

/// Projects a row onto the key; `None` when any component is null.
pub(crate) fn project(row: &Row, indices: &[usize]) -> Option<Vec<CellKey>> {
    indices
        .iter()
        .map(|&idx| {
            let cell = &row[idx];
            (!cell.is_null()).then(|| cell.key())
        })
        .collect()
}

/// Counts null-key rows and rows whose key equals an earlier row's key.
///
/// Null-key rows never take part in the uniqueness comparison.
pub(crate) fn key_stats(table: &Table, indices: &[usize]) -> KeyStats {
    let mut stats = KeyStats::default();
    let mut seen = HashSet::new();

    for row in table.rows() {
        match project(row, indices) {
            None => stats.null_rows += 1,
            Some(key) => {
                if !seen.insert(key) {
                    stats.duplicates += 1;
                }
            }
        }
    }

    stats
}
