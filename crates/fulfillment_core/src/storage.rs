//! Storage traits for loading and writing logical tables.
//!
//! The engine never touches the file system itself. A [`TableSource`] resolves
//! a logical table within a partition; a [`TableSink`] stores a contracted
//! table. Implementations live outside the engine (see `fulfillment_loader`).

use crate::{StorageError, Table, ValidationReport};

/// Loads logical tables.
///
/// Implementations should record per-file diagnostics (files read, files that
/// failed and were skipped) in `report`, and return an error only when no
/// usable table could be assembled.
///
/// # Example
///
/// ```rust
/// use fulfillment_core::{StorageError, Table, TableSource, ValidationReport};
///
/// struct Empty;
///
/// impl TableSource for Empty {
///     fn load(
///         &self,
///         _partition: &str,
///         table: &str,
///         _report: &mut ValidationReport,
///     ) -> Result<Table, StorageError> {
///         Err(StorageError::NotFound {
///             table: table.to_string(),
///             pattern: format!("{table}*.csv"),
///         })
///     }
/// }
/// ```
pub trait TableSource: Send + Sync {
    /// Loads `table` from `partition`.
    fn load(
        &self,
        partition: &str,
        table: &str,
        report: &mut ValidationReport,
    ) -> Result<Table, StorageError>;
}

/// Stores contracted tables.
pub trait TableSink: Send + Sync {
    /// Writes `table` into `partition` and returns a description of where it went.
    fn write(&self, partition: &str, table: &Table) -> Result<String, StorageError>;
}
