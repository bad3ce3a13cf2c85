//! Error types for contract enforcement.

use thiserror::Error;

/// Reasons enforcement of a table is aborted.
///
/// Validation never fails with an error; only the enforcer does, because it
/// refuses to emit a table that would still break its contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnforcementError {
    /// Primary-key columns are absent
    #[error("{table}: cannot enforce contract, missing primary key column(s): {}", .columns.join(", "))]
    MissingKeyColumns { table: String, columns: Vec<String> },

    /// Timeline columns of an event-fact table are absent
    #[error("{table}: cannot enforce contract, missing required timestamp column(s): {}", .columns.join(", "))]
    MissingTimelineColumns { table: String, columns: Vec<String> },

    /// Rows with a null key component survived cleaning
    #[error("{table}: contract violated, {count} row(s) with null primary key values")]
    NullKey { table: String, count: usize },

    /// Duplicated keys survived cleaning
    #[error("{table}: contract violated, {count} duplicated primary key value(s)")]
    DuplicateKey { table: String, count: usize },
}

impl EnforcementError {
    /// Returns the table the error is about.
    pub fn table(&self) -> &str {
        match self {
            Self::MissingKeyColumns { table, .. }
            | Self::MissingTimelineColumns { table, .. }
            | Self::NullKey { table, .. }
            | Self::DuplicateKey { table, .. } => table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_table() {
        let err = EnforcementError::MissingKeyColumns {
            table: "df_payments".to_string(),
            columns: vec!["order_id".to_string(), "payment_sequential".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "df_payments: cannot enforce contract, missing primary key column(s): order_id, payment_sequential"
        );
        assert_eq!(err.table(), "df_payments");

        let err = EnforcementError::DuplicateKey {
            table: "df_OrderItems".to_string(),
            count: 4,
        };
        assert!(err.to_string().contains("4 duplicated"));
    }
}
