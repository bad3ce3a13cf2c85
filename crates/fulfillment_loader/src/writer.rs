//! Writing contracted tables as CSV.

use crate::{table_to_record_batch, LoaderError};
use arrow_csv::WriterBuilder;
use fulfillment_core::{PipelineConfig, StorageError, Table, TableSink};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Writes `table` to `path` with a header row, replacing any existing file.
pub fn write_csv_file(path: &Path, table: &Table) -> Result<(), LoaderError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let batch = table_to_record_batch(table)?;
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new()
        .with_header(true)
        .with_timestamp_format(TIMESTAMP_FORMAT.to_string())
        .build(file);
    writer.write(&batch)?;

    Ok(())
}

/// Writes contracted tables to `<base>/<partition>/<table>.csv`.
#[derive(Debug, Clone)]
pub struct CsvTableSink {
    base_path: PathBuf,
}

impl CsvTableSink {
    /// Creates a sink rooted at `base_path`.
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Creates a sink writing to the contracted partitions of `config`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.contracted_base_path)
    }

    /// Returns the file a table of `partition` is written to.
    pub fn table_path(&self, partition: &str, table: &str) -> PathBuf {
        self.base_path.join(partition).join(format!("{table}.csv"))
    }
}

impl TableSink for CsvTableSink {
    fn write(&self, partition: &str, table: &Table) -> Result<String, StorageError> {
        let path = self.table_path(partition, table.name());
        let location = path.display().to_string();

        write_csv_file(&path, table)
            .map_err(|e| StorageError::write(table.name(), &location, e.to_string()))?;

        debug!("Wrote {} rows to {}", table.num_rows(), location);
        Ok(location)
    }
}
