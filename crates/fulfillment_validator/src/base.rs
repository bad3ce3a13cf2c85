//! Base validation logic, applied to every table regardless of role.
//!
//! Checks run in this order:
//! 1. Emptiness (halts)
//! 2. Duplicate column names
//! 3. Primary-key columns present (halts)
//! 4. Null key values
//! 5. Duplicated key values

use crate::keys::{key_indices, key_stats};
use fulfillment_core::{Table, ValidationReport};

/// Validates table-level invariants shared by all roles.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseValidator;

impl BaseValidator {
    /// Creates a new base validator.
    pub fn new() -> Self {
        Self
    }

    /// Runs the base checks, appending violations to `report`.
    ///
    /// Returns `false` when the table is empty or lacks key columns; role and
    /// cross-table validation must then skip it.
    pub fn validate(
        &self,
        table: &Table,
        primary_key: &[String],
        report: &mut ValidationReport,
    ) -> bool {
        let name = table.name();

        if table.is_empty() {
            report.add_error(format!("{name}: dataset is empty"));
            return false;
        }

        let duplicated = table.duplicate_columns();
        if !duplicated.is_empty() {
            report.add_error(format!(
                "{name}: duplicate column names detected: {}",
                duplicated.join(", ")
            ));
        }

        let missing = table.missing_columns(primary_key);
        if !missing.is_empty() {
            report.add_error(format!(
                "{name}: missing primary key column(s): {}",
                missing.join(", ")
            ));
            return false;
        }

        let stats = key_stats(table, &key_indices(table, primary_key));

        if stats.null_rows > 0 {
            report.add_error(format!(
                "{name}: {} row(s) with null primary key values",
                stats.null_rows
            ));
        }

        if stats.duplicates > 0 {
            report.add_error(format!(
                "{name}: {} duplicated primary key value(s)",
                stats.duplicates
            ));
        }

        true
    }
}
