//! Builder pattern for tables and rule catalogs.
//!
//! This module provides fluent builders used by loaders, catalog files and tests.

use crate::{
    Cell, ForeignKey, Result, Role, Row, RuleCatalog, Table, TableConfig, TableEntry,
    TimelineColumns,
};

/// Builder for creating a `Table`.
///
/// # Example
///
/// ```rust
/// use fulfillment_core::{Cell, TableBuilder};
///
/// let table = TableBuilder::new("df_payments", ["order_id", "payment_sequential", "payment_value"])
///     .row([Cell::from("o1"), Cell::Int(1), Cell::Float(19.9)])
///     .row([Cell::from("o1"), Cell::Int(2), Cell::Float(5.0)])
///     .build()
///     .unwrap();
///
/// assert_eq!(table.num_rows(), 2);
/// ```
#[derive(Debug)]
pub struct TableBuilder {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl TableBuilder {
    /// Creates a new table builder with the given column names.
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Adds a row.
    pub fn row<I>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = Cell>,
    {
        self.rows.push(cells.into_iter().collect());
        self
    }

    /// Adds multiple rows.
    pub fn rows<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = Row>,
    {
        self.rows.extend(rows);
        self
    }

    /// Builds the table.
    ///
    /// Returns an error if any row does not have one cell per column.
    pub fn build(self) -> Result<Table> {
        Table::from_rows(self.name, self.columns, self.rows)
    }
}

/// Builder for creating a `RuleCatalog`.
///
/// # Example
///
/// ```rust
/// use fulfillment_core::{RuleCatalogBuilder, Role};
///
/// let catalog = RuleCatalogBuilder::new()
///     .table("orders", Role::EventFact, ["order_id"])
///     .table("items", Role::TransactionDetail, ["order_id", "item_id"])
///     .reference("items", "order_id", "orders", "order_id")
///     .build()
///     .unwrap();
///
/// assert_eq!(catalog.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct RuleCatalogBuilder {
    tables: Vec<TableEntry>,
    references: Vec<ForeignKey>,
}

impl RuleCatalogBuilder {
    /// Creates an empty catalog builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table with the default timeline columns.
    pub fn table<I, S>(self, name: impl Into<String>, role: Role, primary_key: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table_with_timeline(name, role, primary_key, TimelineColumns::default())
    }

    /// Adds a table with explicit timeline columns.
    pub fn table_with_timeline<I, S>(
        mut self,
        name: impl Into<String>,
        role: Role,
        primary_key: I,
        timeline: TimelineColumns,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.push(TableEntry {
            name: name.into(),
            config: TableConfig {
                role,
                primary_key: primary_key.into_iter().map(Into::into).collect(),
                timeline,
            },
        });
        self
    }

    /// Adds a foreign-key reference from `child_table.child_column` to
    /// `parent_table.parent_column`.
    pub fn reference(
        mut self,
        child_table: impl Into<String>,
        child_column: impl Into<String>,
        parent_table: impl Into<String>,
        parent_column: impl Into<String>,
    ) -> Self {
        self.references.push(ForeignKey {
            child_table: child_table.into(),
            child_column: child_column.into(),
            parent_table: parent_table.into(),
            parent_column: parent_column.into(),
        });
        self
    }

    /// Builds and validates the catalog.
    pub fn build(self) -> Result<RuleCatalog> {
        RuleCatalog::new(self.tables, self.references)
    }
}
