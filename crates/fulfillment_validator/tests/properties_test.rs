//! Behavioural properties of the rule engine, checked through the public API.

mod common;

use common::{order_row, orders, ORDER_COLUMNS};
use fulfillment_core::{Cell, RuleCatalog, Table, TableBuilder, TableSet, ValidationReport};
use fulfillment_validator::{
    validate_cross_table, validator_for, BaseValidator, ContractEnforcer,
};
use pretty_assertions::assert_eq;

/// Runs base and role validation the way the orchestrator does.
fn validate(table: &Table) -> ValidationReport {
    let catalog = RuleCatalog::fulfillment();
    let config = catalog.require(table.name()).unwrap();
    let mut report = ValidationReport::new();
    if BaseValidator::new().validate(table, &config.primary_key, &mut report) {
        validator_for(config.role).validate(table, config, &mut report);
    }
    report
}

fn count_error(report: &ValidationReport, needle: &str) -> Option<usize> {
    report
        .errors()
        .iter()
        .find(|e| e.contains(needle))
        .and_then(|e| e.split(": ").nth(1))
        .and_then(|rest| rest.split(' ').next())
        .and_then(|n| n.parse().ok())
}

#[test]
fn test_empty_table_yields_exactly_one_error() {
    let table = TableBuilder::new("df_Orders", ORDER_COLUMNS).build().unwrap();
    let report = validate(&table);

    assert_eq!(report.errors(), &["df_Orders: dataset is empty".to_string()]);
    assert!(report.info().is_empty());
}

#[test]
fn test_each_extra_duplicate_adds_one() {
    let base = TableBuilder::new("df_Customers", ["customer_id"])
        .row([Cell::from("c1")])
        .row([Cell::from("c2")])
        .build()
        .unwrap();
    assert!(validate(&base).passed());

    for extra in 1..=3usize {
        let mut table = base.clone();
        for _ in 0..extra {
            table.push_row(vec![Cell::from("c1")]).unwrap();
        }
        let report = validate(&table);
        assert_eq!(count_error(&report, "duplicated primary key"), Some(extra));
        assert!(
            report.errors().iter().all(|e| !e.contains("null primary key")),
            "first occurrence must not be flagged: {:?}",
            report.errors()
        );
    }
}

#[test]
fn test_ordering_counts_are_additive() {
    let table = TableBuilder::new("df_Orders", ORDER_COLUMNS)
        .row(order_row("a", "2018-01-05 00:00:00", "2018-01-04 00:00:00", "2018-01-06 00:00:00"))
        .row(order_row("b", "2018-01-05 00:00:00", "2018-01-06 00:00:00", "2018-01-04 00:00:00"))
        .row(order_row("c", "2018-01-05 00:00:00", "2018-01-04 00:00:00", "2018-01-04 00:00:00"))
        .build()
        .unwrap();

    let report = validate(&table);
    assert_eq!(count_error(&report, "approval precedes purchase"), Some(2));
    assert_eq!(count_error(&report, "delivery precedes purchase"), Some(2));
    assert_eq!(report.errors().len(), 2);
}

#[test]
fn test_negative_count_matches_cells() {
    let table = TableBuilder::new("df_payments", ["order_id", "payment_sequential", "payment_value"])
        .row([Cell::from("A"), Cell::Int(1), Cell::Float(-0.01)])
        .row([Cell::from("A"), Cell::Int(2), Cell::Float(-4.0)])
        .row([Cell::from("A"), Cell::Int(3), Cell::Float(-9.5)])
        .row([Cell::from("B"), Cell::Int(1), Cell::Float(0.0)])
        .build()
        .unwrap();

    let report = validate(&table);
    assert_eq!(
        report.errors(),
        &["df_payments: 3 negative value(s) in numeric column `payment_value`".to_string()]
    );
}

#[test]
fn test_orphan_count() {
    let orders = TableBuilder::new("df_Orders", ["order_id"])
        .row([Cell::from("A")])
        .row([Cell::from("B")])
        .build()
        .unwrap();
    let items = TableBuilder::new("df_OrderItems", ["order_id"])
        .row([Cell::from("A")])
        .row([Cell::from("C")])
        .build()
        .unwrap();
    let payments = TableBuilder::new("df_payments", ["order_id", "payment_sequential"])
        .row([Cell::from("B"), Cell::Int(1)])
        .build()
        .unwrap();
    let tables: TableSet = [orders, items, payments].into_iter().collect();

    let mut report = ValidationReport::new();
    validate_cross_table(&tables, &RuleCatalog::fulfillment(), &mut report);

    assert_eq!(
        report.errors(),
        &["df_OrderItems: 1 orphan record(s) referencing non-existent order_id".to_string()]
    );
}

#[test]
fn test_enforcement_is_idempotent_and_output_validates() {
    let catalog = RuleCatalog::fulfillment();
    let config = catalog.get("df_Orders").unwrap();

    let mut dirty = orders();
    dirty.push_row(orders().rows()[0].clone()).unwrap();
    dirty
        .push_row(order_row("C", "2018-01-05 00:00:00", "2018-01-04 00:00:00", "2018-01-09 00:00:00"))
        .unwrap();
    dirty
        .push_row(order_row("D", "yesterday", "2018-01-04 00:00:00", "2018-01-09 00:00:00"))
        .unwrap();

    let enforcer = ContractEnforcer::new();
    let first = enforcer.enforce(&dirty, config).unwrap();
    assert_eq!(first.removed.total(), 3);
    assert_eq!(first.table, orders());

    let second = enforcer.enforce(&first.table, config).unwrap();
    assert_eq!(second.removed.total(), 0);
    assert_eq!(second.table, first.table);

    assert!(validate(&first.table).passed());
}
