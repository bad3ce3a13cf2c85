//! Error types for the fulfillment contracts engine.
//!
//! Rule violations are never errors in this sense: they are recorded in a
//! [`ValidationReport`](crate::ValidationReport). The types here cover broken
//! configuration, malformed tables and storage failures.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Main error type for the core data model.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The rule catalog is inconsistent
    #[error("Invalid rule catalog: {0}")]
    InvalidCatalog(String),

    /// Pipeline configuration is invalid
    #[error("Invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    /// A row does not have one cell per column
    #[error("Row {row} of table '{table}' has {actual} cell(s), expected {expected}")]
    RowArity {
        /// Table name
        table: String,
        /// Row index
        row: usize,
        /// Number of columns
        expected: usize,
        /// Number of cells in the row
        actual: usize,
    },

    /// Table name is not part of the catalog
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while reading or writing physical tables.
///
/// The orchestrator turns these into report errors and excludes the affected
/// table from the run.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No physical file matched the logical table
    #[error("{table}: no files found matching pattern {pattern}")]
    NotFound {
        /// Logical table name
        table: String,
        /// Pattern that was searched
        pattern: String,
    },

    /// Every matching file failed to load
    #[error("{table}: all matching files failed to load")]
    NoReadableFiles {
        /// Logical table name
        table: String,
    },

    /// A file could not be read or decoded
    #[error("Failed to load {table} file {location}: {message}")]
    Read {
        /// Logical table name
        table: String,
        /// File location
        location: String,
        /// Underlying cause
        message: String,
    },

    /// A table could not be written
    #[error("Failed to write {table} to {location}: {message}")]
    Write {
        /// Logical table name
        table: String,
        /// Target location
        location: String,
        /// Underlying cause
        message: String,
    },
}

impl StorageError {
    /// Creates a read error.
    pub fn read(
        table: impl Into<String>,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Read {
            table: table.into(),
            location: location.into(),
            message: message.into(),
        }
    }

    /// Creates a write error.
    pub fn write(
        table: impl Into<String>,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Write {
            table: table.into(),
            location: location.into(),
            message: message.into(),
        }
    }
}
