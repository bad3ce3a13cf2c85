//! In-memory storage and fixture tables shared by the integration tests.

#![allow(dead_code)]

use fulfillment_core::{Cell, StorageError, Table, TableBuilder, TableSink, TableSource, ValidationReport};
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves tables from memory, keyed by (partition, table).
#[derive(Default)]
pub struct MemorySource {
    tables: HashMap<(String, String), Table>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, partition: &str, table: Table) -> Self {
        self.tables
            .insert((partition.to_string(), table.name().to_string()), table);
        self
    }
}

impl TableSource for MemorySource {
    fn load(
        &self,
        partition: &str,
        table: &str,
        report: &mut ValidationReport,
    ) -> Result<Table, StorageError> {
        let found = self
            .tables
            .get(&(partition.to_string(), table.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                table: table.to_string(),
                pattern: format!("{partition}/{table}*.csv"),
            })?;
        report.add_info(format!("Loaded {table} file: memory ({} rows)", found.num_rows()));
        Ok(found)
    }
}

/// Records written tables.
#[derive(Default)]
pub struct MemorySink {
    pub written: Mutex<Vec<(String, Table)>>,
}

impl TableSink for MemorySink {
    fn write(&self, partition: &str, table: &Table) -> Result<String, StorageError> {
        let location = format!("memory://{partition}/{}.csv", table.name());
        self.written
            .lock()
            .map_err(|e| StorageError::write(table.name(), &location, e.to_string()))?
            .push((partition.to_string(), table.clone()));
        Ok(location)
    }
}

pub const ORDER_COLUMNS: [&str; 5] = [
    "order_id",
    "order_purchase_timestamp",
    "order_approved_at",
    "order_delivered_timestamp",
    "order_estimated_delivery_date",
];

pub fn order_row(id: &str, purchase: &str, approved: &str, delivered: &str) -> Vec<Cell> {
    vec![
        Cell::from(id),
        Cell::from(purchase),
        Cell::from(approved),
        Cell::from(delivered),
        Cell::from("2018-03-01 00:00:00"),
    ]
}

/// Orders "A" and "B" with a clean timeline.
pub fn orders() -> Table {
    TableBuilder::new("df_Orders", ORDER_COLUMNS)
        .row(order_row("A", "2018-01-01 10:00:00", "2018-01-01 10:15:00", "2018-01-08 12:00:00"))
        .row(order_row("B", "2018-01-02 09:00:00", "2018-01-02 09:30:00", "2018-01-10 17:00:00"))
        .build()
        .unwrap()
}

pub fn order_items(order_ids: &[&str]) -> Table {
    TableBuilder::new("df_OrderItems", ["order_id", "product_id", "price", "shipping_charges"])
        .rows(order_ids.iter().enumerate().map(|(i, id)| {
            vec![
                Cell::from(*id),
                Cell::from(format!("p{i}")),
                Cell::Float(10.5),
                Cell::Float(2.0),
            ]
        }))
        .build()
        .unwrap()
}

pub fn payments(order_ids: &[&str]) -> Table {
    TableBuilder::new(
        "df_payments",
        ["order_id", "payment_sequential", "payment_type", "payment_value"],
    )
    .rows(order_ids.iter().map(|id| {
        vec![
            Cell::from(*id),
            Cell::Int(1),
            Cell::from("credit_card"),
            Cell::Float(12.5),
        ]
    }))
    .build()
    .unwrap()
}

pub fn customers() -> Table {
    TableBuilder::new("df_Customers", ["customer_id", "customer_city"])
        .row([Cell::from("c1"), Cell::from("sao paulo")])
        .build()
        .unwrap()
}

pub fn products() -> Table {
    TableBuilder::new("df_products", ["product_id", "product_category_name"])
        .row([Cell::from("p0"), Cell::from("toys")])
        .row([Cell::from("p1"), Cell::from("garden")])
        .build()
        .unwrap()
}

/// A clean `train` partition holding all five tables.
pub fn clean_train() -> MemorySource {
    MemorySource::new()
        .with("train", orders())
        .with("train", order_items(&["A", "B"]))
        .with("train", payments(&["A", "B"]))
        .with("train", customers())
        .with("train", products())
}
