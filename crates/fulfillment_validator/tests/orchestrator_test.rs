//! End-to-end orchestration over in-memory partitions.

mod common;

use common::{clean_train, customers, order_items, orders, payments, products, MemorySink, MemorySource};
use fulfillment_core::{Cell, PipelineConfig, RuleCatalog, Severity, TableBuilder};
use fulfillment_validator::Orchestrator;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn orchestrator(source: MemorySource, config: PipelineConfig) -> Orchestrator {
    Orchestrator::new(Arc::new(source), RuleCatalog::fulfillment(), config)
}

#[tokio::test]
async fn test_clean_partition_passes() {
    let report = orchestrator(clean_train(), PipelineConfig::default())
        .validate()
        .await;

    assert!(report.passed(), "unexpected errors: {:?}", report.errors());
    assert!(report.warnings().is_empty());
    assert!(
        report
            .info()
            .iter()
            .any(|m| m.starts_with("df_Orders: purchases span 2018-01-01 10:00:00"))
    );
}

#[tokio::test]
async fn test_messages_follow_catalog_order() {
    let report = orchestrator(clean_train(), PipelineConfig::default())
        .validate()
        .await;

    let loads: Vec<&str> = report
        .entries()
        .filter(|(level, msg)| *level == Severity::Info && msg.starts_with("Loaded "))
        .map(|(_, msg)| msg)
        .collect();
    assert_eq!(
        loads,
        vec![
            "Loaded df_Orders file: memory (2 rows)",
            "Loaded df_OrderItems file: memory (2 rows)",
            "Loaded df_Customers file: memory (1 rows)",
            "Loaded df_payments file: memory (2 rows)",
            "Loaded df_products file: memory (2 rows)",
        ]
    );
}

#[tokio::test]
async fn test_missing_table_is_excluded_and_run_continues() {
    let source = MemorySource::new()
        .with("train", orders())
        .with("train", order_items(&["A", "C"]))
        .with("train", customers())
        .with("train", products());

    let report = orchestrator(source, PipelineConfig::default())
        .validate()
        .await;

    assert_eq!(
        report.errors(),
        &[
            "df_payments: no files found matching pattern train/df_payments*.csv".to_string(),
            "Cross-table validation failed: missing required table(s): df_payments".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_halted_table_is_not_admitted() {
    let empty_orders = TableBuilder::new("df_Orders", common::ORDER_COLUMNS)
        .build()
        .unwrap();
    let source = MemorySource::new()
        .with("train", empty_orders)
        .with("train", order_items(&["A"]))
        .with("train", payments(&["A"]))
        .with("train", customers())
        .with("train", products());

    let report = orchestrator(source, PipelineConfig::default())
        .validate()
        .await;

    assert_eq!(
        report.errors(),
        &[
            "df_Orders: dataset is empty".to_string(),
            "Cross-table validation failed: missing required table(s): df_Orders".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_partitions_are_independent() {
    let source = clean_train()
        .with("test", orders())
        .with("test", order_items(&["A", "Z"]))
        .with("test", payments(&["B"]))
        .with("test", customers())
        .with("test", products());
    let config = PipelineConfig::builder().include_test(true).build().unwrap();

    let report = orchestrator(source, config).validate().await;

    assert_eq!(
        report.errors(),
        &["df_OrderItems: 1 orphan record(s) referencing non-existent order_id".to_string()]
    );
}

#[tokio::test]
async fn test_enforce_writes_clean_tables() {
    let mut dirty_items = order_items(&["A", "B"]);
    dirty_items.push_row(dirty_items.rows()[0].clone()).unwrap();

    let source = MemorySource::new()
        .with("train", orders())
        .with("train", dirty_items)
        .with("train", payments(&["A", "B"]))
        .with("train", customers())
        .with("train", products());
    let sink = Arc::new(MemorySink::default());

    let run = orchestrator(source, PipelineConfig::default())
        .enforce(sink.clone())
        .await;

    assert!(run.passed(), "unexpected errors: {:?}", run.report.errors());
    assert_eq!(run.tables.len(), 5);

    let items = &run.tables[1];
    assert_eq!(items.table, "df_OrderItems");
    assert_eq!(items.rows, 2);
    assert_eq!(items.removed.duplicate_rows, 1);
    assert_eq!(items.location, "memory://train/df_OrderItems.csv");

    let written = sink.written.lock().unwrap();
    assert_eq!(written.len(), 5);
}

#[tokio::test]
async fn test_enforce_reports_aborted_tables() {
    let conflicting = TableBuilder::new("df_Customers", ["customer_id", "customer_city"])
        .row([Cell::from("c1"), Cell::from("recife")])
        .row([Cell::from("c1"), Cell::from("natal")])
        .build()
        .unwrap();
    let source = clean_train().with("train", conflicting);
    let sink = Arc::new(MemorySink::default());

    let run = orchestrator(source, PipelineConfig::default())
        .enforce(sink.clone())
        .await;

    assert!(!run.passed());
    assert_eq!(
        run.report.errors(),
        &["df_Customers: contract violated, 1 duplicated primary key value(s)".to_string()]
    );
    assert_eq!(run.tables.len(), 4);
    assert!(
        sink.written
            .lock()
            .unwrap()
            .iter()
            .all(|(_, table)| table.name() != "df_Customers")
    );
}
