//! Timestamp parsing for timeline columns.
//!
//! A value that cannot be parsed yields `None`; it is never coerced to a
//! sentinel date.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use fulfillment_core::{Cell, Table};

/// Integers above this are read as epoch milliseconds, below as seconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 10_000_000_000;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parses a cell into a naive UTC timestamp.
///
/// Accepts native timestamps, strings (see [`parse_timestamp_str`]) and
/// integer epoch seconds or milliseconds. Nulls, floats and booleans are
/// unparsable.
///
/// # Example
///
/// ```rust
/// use fulfillment_core::Cell;
/// use fulfillment_validator::parse_timestamp;
///
/// let parsed = parse_timestamp(&Cell::from("2017-10-02 10:56:33")).unwrap();
/// assert_eq!(parsed.to_string(), "2017-10-02 10:56:33");
/// assert!(parse_timestamp(&Cell::Null).is_none());
/// ```
pub fn parse_timestamp(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::Timestamp(ts) => Some(*ts),
        Cell::String(s) => parse_timestamp_str(s),
        Cell::Int(epoch) => parse_epoch(*epoch),
        Cell::Null | Cell::Float(_) | Cell::Bool(_) => None,
    }
}

/// Parses a timestamp string.
///
/// Tries RFC 3339 (converted to UTC), then `YYYY-MM-DD HH:MM:SS[.fff]` with a
/// space or `T` separator, then a bare `YYYY-MM-DD` date at midnight.
pub fn parse_timestamp_str(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn parse_epoch(epoch: i64) -> Option<NaiveDateTime> {
    let dt = if epoch.abs() > EPOCH_MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(epoch)
    } else {
        DateTime::from_timestamp(epoch, 0)
    };
    dt.map(|dt| dt.naive_utc())
}

/// Parses every cell of the column at `index`.
pub fn parse_column(table: &Table, index: usize) -> Vec<Option<NaiveDateTime>> {
    table.column_values(index).map(parse_timestamp).collect()
}
