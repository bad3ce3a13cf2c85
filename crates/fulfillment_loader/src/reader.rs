//! Reading logical tables from CSV files.

use crate::{discover, record_batch_to_rows, table_pattern, LoaderError};
use arrow_csv::reader::{Format, ReaderBuilder};
use arrow_schema::{DataType, Field, Schema};
use fulfillment_core::{PipelineConfig, StorageError, Table, TableSource, ValidationReport};
use std::fs::File;
use std::io::Seek;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Reads one CSV file into a table named `name`.
///
/// Column types are inferred from the whole file; empty fields are nulls.
/// Date and time columns are kept as text: a value shaped like a timestamp
/// may still be invalid, and the validators count those per column.
pub fn read_csv_file(path: &Path, name: &str) -> Result<Table, LoaderError> {
    let mut file = File::open(path)?;
    let format = Format::default().with_header(true);

    let (inferred, _) = format.infer_schema(&mut file, None)?;
    if inferred.fields().is_empty() {
        return Err(LoaderError::NoColumns);
    }
    let schema = temporal_as_text(&inferred);
    file.rewind()?;

    let columns: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_format(format)
        .build(file)?;

    let mut table = Table::new(name, columns);
    for batch in reader {
        for row in record_batch_to_rows(&batch?)? {
            table.push_row(row)?;
        }
    }

    Ok(table)
}

fn temporal_as_text(schema: &Schema) -> Schema {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|field| match field.data_type() {
            DataType::Timestamp(_, _)
            | DataType::Date32
            | DataType::Date64
            | DataType::Time32(_)
            | DataType::Time64(_) => Field::new(field.name(), DataType::Utf8, true),
            _ => field.as_ref().clone(),
        })
        .collect();
    Schema::new(fields)
}

/// Loads logical tables from `<base>/<partition>/<table>*.csv`.
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    base_path: PathBuf,
}

impl CsvTableSource {
    /// Creates a source rooted at `base_path`.
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Creates a source reading the raw partitions of `config`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.raw_base_path)
    }
}

impl TableSource for CsvTableSource {
    fn load(
        &self,
        partition: &str,
        table: &str,
        report: &mut ValidationReport,
    ) -> Result<Table, StorageError> {
        let dir = self.base_path.join(partition);
        let pattern = table_pattern(&dir, table);

        let files = discover(&dir, table)
            .map_err(|e| StorageError::read(table, &pattern, e.to_string()))?;
        if files.is_empty() {
            return Err(StorageError::NotFound {
                table: table.to_string(),
                pattern,
            });
        }

        let mut loaded = Vec::with_capacity(files.len());
        for path in &files {
            match read_csv_file(path, table) {
                Ok(part) => {
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    debug!("Read {} ({} rows)", path.display(), part.num_rows());
                    report.add_info(format!(
                        "Loaded {table} file: {file_name} ({} rows)",
                        part.num_rows()
                    ));
                    loaded.push(part);
                }
                Err(e) => {
                    warn!("Skipping unreadable file {}: {}", path.display(), e);
                    report.add_error(
                        StorageError::read(table, path.display().to_string(), e.to_string())
                            .to_string(),
                    );
                }
            }
        }

        if loaded.is_empty() {
            return Err(StorageError::NoReadableFiles {
                table: table.to_string(),
            });
        }

        if loaded.iter().any(|t| t.columns() != loaded[0].columns()) {
            report.add_warning(format!(
                "{table}: files have differing columns, missing values are filled with nulls"
            ));
        }

        let combined = Table::concat(table, loaded);
        report.add_info(format!(
            "{table}: combined {} file(s) into {} rows",
            files.len(),
            combined.num_rows()
        ));

        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulfillment_core::Cell;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_read_infers_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("df_payments.csv");
        fs::write(
            &path,
            "order_id,payment_sequential,payment_type,payment_value\n\
             A,1,credit_card,10.5\n\
             B,2,,-3\n",
        )
        .unwrap();

        let table = read_csv_file(&path, "df_payments").unwrap();
        assert_eq!(table.name(), "df_payments");
        assert_eq!(
            table.rows()[1],
            vec![Cell::from("B"), Cell::Int(2), Cell::Null, Cell::Float(-3.0)]
        );
    }

    #[test]
    fn test_read_keeps_timestamps_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("df_Orders.csv");
        fs::write(
            &path,
            "order_id,order_purchase_timestamp,order_estimated_delivery_date\n\
             A,2017-10-02 10:56:33,2017-10-20\n\
             B,2018-02-30 11:00:00,\n",
        )
        .unwrap();

        let table = read_csv_file(&path, "df_Orders").unwrap();
        assert_eq!(
            table.rows()[0],
            vec![Cell::from("A"), Cell::from("2017-10-02 10:56:33"), Cell::from("2017-10-20")]
        );
        assert_eq!(
            table.rows()[1],
            vec![Cell::from("B"), Cell::from("2018-02-30 11:00:00"), Cell::Null]
        );
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("df_products.csv");
        fs::write(&path, "").unwrap();

        assert!(read_csv_file(&path, "df_products").is_err());
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("df_products.csv");
        fs::write(&path, "product_id,product_category_name\n").unwrap();

        let table = read_csv_file(&path, "df_products").unwrap();
        assert_eq!(table.columns(), &["product_id".to_string(), "product_category_name".to_string()][..]);
        assert!(table.is_empty());
    }
}
