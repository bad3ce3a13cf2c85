//! In-memory tabular representation.
//!
//! A [`Table`] holds ordered named columns and ordered rows of [`Cell`]s. Row
//! order is the load order: files are concatenated in discovery order and rows
//! keep their position within each file.

use crate::{CoreError, Result};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A single typed value in a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Null/missing value
    Null,
    /// String value
    String(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Timestamp without timezone
    Timestamp(NaiveDateTime),
}

impl Cell {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Attempts to get this value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get this value as a number. Integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(f) => Some(*f),
            Cell::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns true for integer and float cells.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Cell::Int(_) | Cell::Float(_))
    }

    /// Returns the type-normalized comparison key of this value.
    ///
    /// Integral floats map to the integer of the same value so that `1.0` and
    /// `1` collide; every NaN maps to the same key.
    pub fn key(&self) -> CellKey {
        match self {
            Cell::Null => CellKey::Null,
            Cell::String(s) => CellKey::String(s.clone()),
            Cell::Int(i) => CellKey::Int(*i),
            Cell::Float(f) => {
                if f.is_finite()
                    && f.fract() == 0.0
                    && *f >= i64::MIN as f64
                    && *f < i64::MAX as f64
                {
                    CellKey::Int(*f as i64)
                } else if f.is_nan() {
                    CellKey::Float(f64::NAN.to_bits())
                } else {
                    CellKey::Float(f.to_bits())
                }
            }
            Cell::Bool(b) => CellKey::Bool(*b),
            Cell::Timestamp(ts) => CellKey::Timestamp(*ts),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::String(s) => f.write_str(s),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Timestamp(ts) => write!(f, "{ts}"),
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::String(s)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::String(s.to_string())
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Float(f)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(ts: NaiveDateTime) -> Self {
        Cell::Timestamp(ts)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Null)
    }
}

/// Hashable, type-normalized form of a [`Cell`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Null,
    String(String),
    Int(i64),
    Float(u64),
    Bool(bool),
    Timestamp(NaiveDateTime),
}

/// The value type shared by every non-null cell of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// No non-null cells
    Empty,
    Integer,
    /// Floats, or a mix of integers and floats
    Float,
    Boolean,
    Timestamp,
    Text,
    /// Incompatible value types
    Mixed,
}

impl ColumnKind {
    /// Returns true for integer and float columns.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    fn of(cell: &Cell) -> ColumnKind {
        match cell {
            Cell::Null => ColumnKind::Empty,
            Cell::String(_) => ColumnKind::Text,
            Cell::Int(_) => ColumnKind::Integer,
            Cell::Float(_) => ColumnKind::Float,
            Cell::Bool(_) => ColumnKind::Boolean,
            Cell::Timestamp(_) => ColumnKind::Timestamp,
        }
    }

    fn merge(self, other: ColumnKind) -> ColumnKind {
        use ColumnKind::*;
        match (self, other) {
            (Empty, k) | (k, Empty) => k,
            (a, b) if a == b => a,
            (Integer, Float) | (Float, Integer) => Float,
            _ => Mixed,
        }
    }
}

/// A single row of data, one cell per column.
pub type Row = Vec<Cell>;

/// A logical table: named columns and rows in load order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with the given columns.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Creates a table from rows, checking that every row has one cell per column.
    pub fn from_rows(name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut table = Self::new(name, columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Returns the logical table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the rows in load order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(CoreError::RowArity {
                table: self.name.clone(),
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Returns the index of the first column with the given name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns true if a column with the given name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Returns the names from `names` that are not columns of this table.
    pub fn missing_columns<'a>(&self, names: &'a [String]) -> Vec<&'a str> {
        names
            .iter()
            .filter(|n| !self.has_column(n))
            .map(String::as_str)
            .collect()
    }

    /// Iterates the cells of the column at `index`.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Iterates the cells of the named column, if present.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        self.column_index(name).map(|idx| self.column_values(idx))
    }

    /// Returns each column name that appears more than once, in first-repeat order.
    pub fn duplicate_columns(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for column in &self.columns {
            if !seen.insert(column.as_str()) && !duplicates.contains(column) {
                duplicates.push(column.clone());
            }
        }
        duplicates
    }

    /// Infers the shared value type of the column at `index`.
    pub fn column_kind(&self, index: usize) -> ColumnKind {
        self.column_values(index)
            .map(ColumnKind::of)
            .fold(ColumnKind::Empty, ColumnKind::merge)
    }

    /// Returns a new table containing the rows for which `keep` returns true.
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(usize, &Row) -> bool,
    {
        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .enumerate()
                .filter(|(idx, row)| keep(*idx, row))
                .map(|(_, row)| row.clone())
                .collect(),
        }
    }

    /// Concatenates tables row-wise under a single name.
    ///
    /// Columns are the union of all inputs in first-seen order, matched by
    /// name and occurrence, so a repeated header stays repeated. A column
    /// missing from one input is filled with nulls for that input's rows.
    pub fn concat(name: impl Into<String>, tables: Vec<Table>) -> Table {
        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for (idx, column) in table.columns.iter().enumerate() {
                let occurrence = occurrence_of(&table.columns, idx);
                if columns.iter().filter(|c| *c == column).count() <= occurrence {
                    columns.push(column.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(tables.iter().map(Table::num_rows).sum());
        for table in tables {
            let positions: Vec<Option<usize>> = (0..columns.len())
                .map(|idx| {
                    let occurrence = occurrence_of(&columns, idx);
                    table
                        .columns
                        .iter()
                        .enumerate()
                        .filter(|(_, c)| **c == columns[idx])
                        .nth(occurrence)
                        .map(|(pos, _)| pos)
                })
                .collect();
            for row in table.rows {
                rows.push(
                    positions
                        .iter()
                        .map(|pos| pos.map(|p| row[p].clone()).unwrap_or(Cell::Null))
                        .collect(),
                );
            }
        }

        Table {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Renames the table.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// How many columns before `idx` share its name.
fn occurrence_of(columns: &[String], idx: usize) -> usize {
    columns[..idx].iter().filter(|c| **c == columns[idx]).count()
}

/// The tables loaded for one partition, keyed by logical name.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: BTreeMap<String, Table>,
}

impl TableSet {
    /// Creates an empty table set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table under its own name, replacing any previous one.
    pub fn insert(&mut self, table: Table) {
        self.tables.insert(table.name().to_string(), table);
    }

    /// Gets a table by logical name.
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Returns true if a table with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Returns the number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no table is present.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Returns the table names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

impl FromIterator<Table> for TableSet {
    fn from_iter<T: IntoIterator<Item = Table>>(iter: T) -> Self {
        let mut set = TableSet::new();
        for table in iter {
            set.insert(table);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cell_key_normalizes_integral_floats() {
        assert_eq!(Cell::Float(1.0).key(), Cell::Int(1).key());
        assert_ne!(Cell::Float(1.5).key(), Cell::Int(1).key());
        assert_eq!(Cell::Float(f64::NAN).key(), Cell::Float(-f64::NAN).key());
        assert_ne!(Cell::from("1").key(), Cell::Int(1).key());
    }

    #[test]
    fn test_push_row_checks_arity() {
        let mut table = Table::new("t", cols(&["a", "b"]));
        assert!(table.push_row(vec![Cell::Int(1), Cell::Int(2)]).is_ok());
        let err = table.push_row(vec![Cell::Int(1)]).unwrap_err();
        assert!(matches!(err, CoreError::RowArity { row: 1, .. }));
    }

    #[test]
    fn test_duplicate_columns() {
        let table = Table::new("t", cols(&["a", "b", "a", "c", "b", "a"]));
        assert_eq!(table.duplicate_columns(), vec!["a", "b"]);
    }

    #[test]
    fn test_column_kind() {
        let table = Table::from_rows(
            "t",
            cols(&["int", "mixed_num", "text", "empty", "mixed"]),
            vec![
                vec![
                    Cell::Int(1),
                    Cell::Int(1),
                    Cell::from("x"),
                    Cell::Null,
                    Cell::Int(1),
                ],
                vec![
                    Cell::Null,
                    Cell::Float(2.5),
                    Cell::from("y"),
                    Cell::Null,
                    Cell::from("z"),
                ],
            ],
        )
        .unwrap();

        assert_eq!(table.column_kind(0), ColumnKind::Integer);
        assert_eq!(table.column_kind(1), ColumnKind::Float);
        assert_eq!(table.column_kind(2), ColumnKind::Text);
        assert_eq!(table.column_kind(3), ColumnKind::Empty);
        assert_eq!(table.column_kind(4), ColumnKind::Mixed);
        assert!(table.column_kind(1).is_numeric());
        assert!(!table.column_kind(3).is_numeric());
    }

    #[test]
    fn test_concat_keeps_repeated_columns() {
        let first = Table::from_rows(
            "a",
            cols(&["product_id", "weight", "weight"]),
            vec![vec![Cell::from("p1"), Cell::Int(1), Cell::Int(2)]],
        )
        .unwrap();
        let second = Table::from_rows(
            "b",
            cols(&["product_id", "weight"]),
            vec![vec![Cell::from("p2"), Cell::Int(3)]],
        )
        .unwrap();

        let combined = Table::concat("df_products", vec![first, second]);
        assert_eq!(combined.columns(), &cols(&["product_id", "weight", "weight"])[..]);
        assert_eq!(combined.duplicate_columns(), vec!["weight"]);
        assert_eq!(combined.rows()[0], vec![Cell::from("p1"), Cell::Int(1), Cell::Int(2)]);
        assert_eq!(combined.rows()[1], vec![Cell::from("p2"), Cell::Int(3), Cell::Null]);
    }

    #[test]
    fn test_concat_aligns_columns() {
        let first = Table::from_rows("a", cols(&["id", "x"]), vec![vec![Cell::Int(1), Cell::Int(10)]])
            .unwrap();
        let second = Table::from_rows(
            "b",
            cols(&["id", "y"]),
            vec![
                vec![Cell::Int(2), Cell::from("b")],
                vec![Cell::Int(3), Cell::from("c")],
            ],
        )
        .unwrap();

        let combined = Table::concat("df_Orders", vec![first, second]);
        assert_eq!(combined.name(), "df_Orders");
        assert_eq!(combined.columns(), &cols(&["id", "x", "y"])[..]);
        assert_eq!(combined.num_rows(), 3);
        assert_eq!(combined.rows()[0], vec![Cell::Int(1), Cell::Int(10), Cell::Null]);
        assert_eq!(combined.rows()[2], vec![Cell::Int(3), Cell::Null, Cell::from("c")]);
    }

    #[test]
    fn test_filter_rows_keeps_order() {
        let table = Table::from_rows(
            "t",
            cols(&["id"]),
            (0..5).map(|i| vec![Cell::Int(i)]).collect(),
        )
        .unwrap();
        let odd = table.filter_rows(|_, row| matches!(row[0], Cell::Int(i) if i % 2 == 1));
        assert_eq!(odd.rows(), &[vec![Cell::Int(1)], vec![Cell::Int(3)]][..]);
        assert_eq!(table.num_rows(), 5);
    }

    #[test]
    fn test_table_set() {
        let set: TableSet = vec![Table::new("b", vec![]), Table::new("a", vec![])]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains("a"));
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
