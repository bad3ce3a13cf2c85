//! CSV storage for the fulfillment contracts engine.
//!
//! A logical table `T` in partition `P` is every file matching
//! `<base>/P/T*.csv`, read with Arrow's CSV reader (types are inferred per
//! file) and concatenated in sorted file order. Contracted tables are
//! written to `<base>/P/T.csv`.
//!
//! # Example
//!
//! ```no_run
//! use fulfillment_core::{TableSource, ValidationReport};
//! use fulfillment_loader::CsvTableSource;
//!
//! let source = CsvTableSource::new("data/raw");
//! let mut report = ValidationReport::new();
//! let orders = source.load("train", "df_Orders", &mut report).unwrap();
//! println!("{} rows", orders.num_rows());
//! ```

use thiserror::Error;

mod converter;
mod discovery;
mod reader;
mod writer;

pub use converter::{arrow_value_to_cell, record_batch_to_rows, table_to_record_batch};
pub use discovery::{discover, table_pattern};
pub use reader::{read_csv_file, CsvTableSource};
pub use writer::{write_csv_file, CsvTableSink};

/// Errors raised while reading or writing CSV files.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding or encoding failed
    #[error("CSV error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    /// The discovery pattern is invalid
    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// An Arrow value could not be mapped to a cell
    #[error("Failed to convert value: {0}")]
    TypeConversion(String),

    /// The file has no header row
    #[error("file has no columns")]
    NoColumns,

    /// Decoded rows do not fit the table
    #[error(transparent)]
    Table(#[from] fulfillment_core::CoreError),
}
