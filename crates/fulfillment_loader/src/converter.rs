//! Type conversion between Arrow arrays and table cells.

use crate::LoaderError;
use arrow_array::array::*;
use arrow_array::RecordBatch;
use arrow_schema::{DataType, Field, Schema, TimeUnit};
use fulfillment_core::{Cell, ColumnKind, Row, Table};
use std::sync::Arc;
use tracing::warn;

fn downcast<'a, T: 'static>(array: &'a ArrayRef, name: &str) -> Result<&'a T, LoaderError> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| LoaderError::TypeConversion(format!("Failed to downcast to {name}")))
}

fn datetime_cell(value: Option<chrono::NaiveDateTime>) -> Result<Cell, LoaderError> {
    value
        .map(Cell::Timestamp)
        .ok_or_else(|| LoaderError::TypeConversion("Invalid timestamp value".to_string()))
}

/// Converts the Arrow value at `row_idx` to a cell.
pub fn arrow_value_to_cell(array: &ArrayRef, row_idx: usize) -> Result<Cell, LoaderError> {
    if array.is_null(row_idx) {
        return Ok(Cell::Null);
    }

    match array.data_type() {
        DataType::Null => Ok(Cell::Null),
        DataType::Boolean => {
            let array = downcast::<BooleanArray>(array, "BooleanArray")?;
            Ok(Cell::Bool(array.value(row_idx)))
        }
        DataType::Int32 => {
            let array = downcast::<Int32Array>(array, "Int32Array")?;
            Ok(Cell::Int(array.value(row_idx) as i64))
        }
        DataType::Int64 => {
            let array = downcast::<Int64Array>(array, "Int64Array")?;
            Ok(Cell::Int(array.value(row_idx)))
        }
        DataType::UInt64 => {
            let array = downcast::<UInt64Array>(array, "UInt64Array")?;
            i64::try_from(array.value(row_idx))
                .map(Cell::Int)
                .map_err(|e| LoaderError::TypeConversion(e.to_string()))
        }
        DataType::Float32 => {
            let array = downcast::<Float32Array>(array, "Float32Array")?;
            Ok(Cell::Float(array.value(row_idx) as f64))
        }
        DataType::Float64 => {
            let array = downcast::<Float64Array>(array, "Float64Array")?;
            Ok(Cell::Float(array.value(row_idx)))
        }
        DataType::Utf8 => {
            let array = downcast::<StringArray>(array, "StringArray")?;
            Ok(Cell::String(array.value(row_idx).to_string()))
        }
        DataType::LargeUtf8 => {
            let array = downcast::<LargeStringArray>(array, "LargeStringArray")?;
            Ok(Cell::String(array.value(row_idx).to_string()))
        }
        DataType::Timestamp(TimeUnit::Second, _) => {
            let array = downcast::<TimestampSecondArray>(array, "TimestampSecondArray")?;
            datetime_cell(array.value_as_datetime(row_idx))
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            let array = downcast::<TimestampMillisecondArray>(array, "TimestampMillisecondArray")?;
            datetime_cell(array.value_as_datetime(row_idx))
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            let array = downcast::<TimestampMicrosecondArray>(array, "TimestampMicrosecondArray")?;
            datetime_cell(array.value_as_datetime(row_idx))
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            let array = downcast::<TimestampNanosecondArray>(array, "TimestampNanosecondArray")?;
            datetime_cell(array.value_as_datetime(row_idx))
        }
        DataType::Date32 => {
            let array = downcast::<Date32Array>(array, "Date32Array")?;
            datetime_cell(array.value_as_datetime(row_idx))
        }
        DataType::Date64 => {
            let array = downcast::<Date64Array>(array, "Date64Array")?;
            datetime_cell(array.value_as_datetime(row_idx))
        }
        other => {
            warn!("Unsupported Arrow type for conversion: {:?}", other);
            Err(LoaderError::TypeConversion(format!(
                "unsupported Arrow type {other:?}"
            )))
        }
    }
}

/// Converts every row of a record batch.
pub fn record_batch_to_rows(batch: &RecordBatch) -> Result<Vec<Row>, LoaderError> {
    (0..batch.num_rows())
        .map(|row_idx| {
            batch
                .columns()
                .iter()
                .map(|column| arrow_value_to_cell(column, row_idx))
                .collect()
        })
        .collect()
}

/// Builds a record batch from a table.
///
/// Each column takes the Arrow type matching its [`ColumnKind`]; integer cells
/// widen to float in float columns. Mixed and all-null columns become strings.
pub fn table_to_record_batch(table: &Table) -> Result<RecordBatch, LoaderError> {
    let mut fields = Vec::with_capacity(table.columns().len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.columns().len());

    for (idx, name) in table.columns().iter().enumerate() {
        let values = table.column_values(idx);
        let array: ArrayRef = match table.column_kind(idx) {
            ColumnKind::Integer => Arc::new(
                values
                    .map(|c| match c {
                        Cell::Int(i) => Some(*i),
                        _ => None,
                    })
                    .collect::<Int64Array>(),
            ),
            ColumnKind::Float => Arc::new(values.map(Cell::as_f64).collect::<Float64Array>()),
            ColumnKind::Boolean => Arc::new(
                values
                    .map(|c| match c {
                        Cell::Bool(b) => Some(*b),
                        _ => None,
                    })
                    .collect::<BooleanArray>(),
            ),
            ColumnKind::Timestamp => Arc::new(
                values
                    .map(|c| match c {
                        Cell::Timestamp(ts) => Some(ts.and_utc().timestamp_micros()),
                        _ => None,
                    })
                    .collect::<TimestampMicrosecondArray>(),
            ),
            ColumnKind::Text | ColumnKind::Mixed | ColumnKind::Empty => Arc::new(
                values
                    .map(|c| (!c.is_null()).then(|| c.to_string()))
                    .collect::<StringArray>(),
            ),
        };

        fields.push(Field::new(name, array.data_type().clone(), true));
        arrays.push(array);
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}
