//! Non-negative numeric rule for transaction-detail tables.

use crate::RoleValidator;
use fulfillment_core::{Role, Table, TableConfig, ValidationReport};

/// Validates transaction-detail tables.
///
/// A column is numeric when every non-null cell is an integer or float and at
/// least one cell is non-null. Each numeric column holding negatives yields
/// one error with the count.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransactionDetailValidator;

impl RoleValidator for TransactionDetailValidator {
    fn role(&self) -> Role {
        Role::TransactionDetail
    }

    fn validate(&self, table: &Table, _config: &TableConfig, report: &mut ValidationReport) {
        for (idx, column) in table.columns().iter().enumerate() {
            if !table.column_kind(idx).is_numeric() {
                continue;
            }

            let negatives = table
                .column_values(idx)
                .filter_map(|cell| cell.as_f64())
                .filter(|v| *v < 0.0)
                .count();

            if negatives > 0 {
                report.add_error(format!(
                    "{}: {negatives} negative value(s) in numeric column `{column}`",
                    table.name()
                ));
            }
        }
    }
}
