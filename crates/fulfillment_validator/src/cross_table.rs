//! Referential-integrity checks across the tables of one partition.

use fulfillment_core::{CellKey, ForeignKey, RuleCatalog, Table, TableSet, ValidationReport};
use std::collections::HashSet;

/// Checks every reference of `catalog` against the admitted tables.
///
/// Every table named by a reference must be present, otherwise one error
/// lists the missing ones and no reference is checked. References are then
/// checked independently of each other. A child row whose key is null or
/// absent from the parent's key set is an orphan.
///
/// # Example
///
/// ```rust
/// use fulfillment_core::{Cell, RuleCatalogBuilder, Role, TableBuilder, TableSet, ValidationReport};
/// use fulfillment_validator::validate_cross_table;
///
/// let catalog = RuleCatalogBuilder::new()
///     .table("orders", Role::EventFact, ["order_id"])
///     .table("items", Role::TransactionDetail, ["order_id"])
///     .reference("items", "order_id", "orders", "order_id")
///     .build()
///     .unwrap();
///
/// let orders = TableBuilder::new("orders", ["order_id"])
///     .row([Cell::from("A")])
///     .row([Cell::from("B")])
///     .build()
///     .unwrap();
/// let items = TableBuilder::new("items", ["order_id"])
///     .row([Cell::from("A")])
///     .row([Cell::from("C")])
///     .build()
///     .unwrap();
/// let tables: TableSet = [orders, items].into_iter().collect();
///
/// let mut report = ValidationReport::new();
/// validate_cross_table(&tables, &catalog, &mut report);
/// assert_eq!(
///     report.errors(),
///     &["items: 1 orphan record(s) referencing non-existent order_id".to_string()]
/// );
/// ```
pub fn validate_cross_table(tables: &TableSet, catalog: &RuleCatalog, report: &mut ValidationReport) {
    let missing: Vec<&str> = catalog
        .cross_table_requirements()
        .into_iter()
        .filter(|name| !tables.contains(name))
        .collect();

    if !missing.is_empty() {
        report.add_error(format!(
            "Cross-table validation failed: missing required table(s): {}",
            missing.join(", ")
        ));
        return;
    }

    for reference in catalog.references() {
        if let (Some(child), Some(parent)) = (
            tables.get(&reference.child_table),
            tables.get(&reference.parent_table),
        ) {
            check_reference(reference, child, parent, report);
        }
    }
}

fn check_reference(reference: &ForeignKey, child: &Table, parent: &Table, report: &mut ValidationReport) {
    let (Some(child_idx), Some(parent_idx)) = (
        column_or_report(child, &reference.child_column, reference, report),
        column_or_report(parent, &reference.parent_column, reference, report),
    ) else {
        return;
    };

    let parent_keys: HashSet<CellKey> = parent
        .column_values(parent_idx)
        .filter(|cell| !cell.is_null())
        .map(|cell| cell.key())
        .collect();

    let orphans = child
        .column_values(child_idx)
        .filter(|cell| cell.is_null() || !parent_keys.contains(&cell.key()))
        .count();

    if orphans > 0 {
        report.add_error(format!(
            "{}: {orphans} orphan record(s) referencing non-existent {}",
            reference.child_table, reference.parent_column
        ));
    }
}

fn column_or_report(
    table: &Table,
    column: &str,
    reference: &ForeignKey,
    report: &mut ValidationReport,
) -> Option<usize> {
    let idx = table.column_index(column);
    if idx.is_none() {
        report.add_error(format!(
            "Cross-table validation failed: {} has no column `{column}` required by {reference}",
            table.name()
        ));
    }
    idx
}
