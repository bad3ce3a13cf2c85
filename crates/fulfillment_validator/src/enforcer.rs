//! Contract enforcement: strip violating rows into a new table.
//!
//! Steps, in order:
//! 1. Key columns must be present
//! 2. Exact-duplicate rows collapse to their first occurrence
//! 3. Event-fact rows with an unparsable timeline value are dropped
//! 4. Event-fact rows where approval or delivery precedes purchase are dropped
//! 5. The key must then be free of nulls and duplicates
//!
//! The input table is never modified. Enforcing an enforced table removes
//! nothing.

use crate::event_fact::ParsedTimeline;
use crate::keys::{key_indices, key_stats};
use crate::EnforcementError;
use fulfillment_core::{CellKey, Role, Table, TableConfig};
use std::collections::HashSet;
use std::fmt;

/// Number of rows removed per reason.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RemovalCounts {
    /// Exact duplicates of an earlier row
    pub duplicate_rows: usize,
    /// Rows with at least one unparsable timeline value
    pub unparsable_timestamps: usize,
    /// Rows where approval or delivery precedes purchase
    pub temporal_violations: usize,
}

impl RemovalCounts {
    /// Total rows removed.
    pub fn total(&self) -> usize {
        self.duplicate_rows + self.unparsable_timestamps + self.temporal_violations
    }
}

impl fmt::Display for RemovalCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} duplicate row(s), {} row(s) with unparsable timestamps, {} row(s) with temporal violations",
            self.duplicate_rows, self.unparsable_timestamps, self.temporal_violations
        )
    }
}

/// The contracted table and what was removed to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct EnforcementOutcome {
    pub table: Table,
    pub removed: RemovalCounts,
}

impl EnforcementOutcome {
    /// Describes the outcome as a report line.
    pub fn summary(&self) -> String {
        format!(
            "{}: contract enforced, kept {} row(s), removed {}",
            self.table.name(),
            self.table.num_rows(),
            self.removed
        )
    }
}

/// Produces contract-compliant tables.
///
/// # Example
///
/// ```rust
/// use fulfillment_core::{Cell, RuleCatalog, TableBuilder};
/// use fulfillment_validator::ContractEnforcer;
///
/// let catalog = RuleCatalog::fulfillment();
/// let table = TableBuilder::new("df_products", ["product_id", "product_category_name"])
///     .row([Cell::from("p1"), Cell::from("toys")])
///     .row([Cell::from("p1"), Cell::from("toys")])
///     .build()
///     .unwrap();
///
/// let outcome = ContractEnforcer::new()
///     .enforce(&table, catalog.get("df_products").unwrap())
///     .unwrap();
/// assert_eq!(outcome.table.num_rows(), 1);
/// assert_eq!(outcome.removed.duplicate_rows, 1);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ContractEnforcer;

impl ContractEnforcer {
    /// Creates a new enforcer.
    pub fn new() -> Self {
        Self
    }

    /// Enforces the contract of `config` on `table`.
    pub fn enforce(
        &self,
        table: &Table,
        config: &TableConfig,
    ) -> Result<EnforcementOutcome, EnforcementError> {
        let missing = table.missing_columns(&config.primary_key);
        if !missing.is_empty() {
            return Err(EnforcementError::MissingKeyColumns {
                table: table.name().to_string(),
                columns: missing.into_iter().map(str::to_string).collect(),
            });
        }

        let mut removed = RemovalCounts::default();

        let mut seen: HashSet<Vec<CellKey>> = HashSet::new();
        let mut current =
            table.filter_rows(|_, row| seen.insert(row.iter().map(|c| c.key()).collect()));
        removed.duplicate_rows = table.num_rows() - current.num_rows();

        if config.role == Role::EventFact {
            let timeline = ParsedTimeline::parse(&current, &config.timeline).map_err(|columns| {
                EnforcementError::MissingTimelineColumns {
                    table: table.name().to_string(),
                    columns,
                }
            })?;

            let parsed = current.filter_rows(|idx, _| timeline.row_parsed(idx));
            removed.unparsable_timestamps = current.num_rows() - parsed.num_rows();

            let ordered = current.filter_rows(|idx, _| {
                timeline.row_parsed(idx) && !timeline.row_out_of_order(idx)
            });
            removed.temporal_violations = parsed.num_rows() - ordered.num_rows();
            current = ordered;
        }

        let stats = key_stats(&current, &key_indices(&current, &config.primary_key));
        if stats.null_rows > 0 {
            return Err(EnforcementError::NullKey {
                table: table.name().to_string(),
                count: stats.null_rows,
            });
        }
        if stats.duplicates > 0 {
            return Err(EnforcementError::DuplicateKey {
                table: table.name().to_string(),
                count: stats.duplicates,
            });
        }

        Ok(EnforcementOutcome {
            table: current,
            removed,
        })
    }
}
