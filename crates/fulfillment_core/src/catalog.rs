//! Rule catalog: which rules apply to which logical table.
//!
//! The catalog is closed: tables that are not listed are never loaded or
//! validated. It is built once at startup, either from
//! [`RuleCatalog::fulfillment`] or from a catalog file, and is immutable
//! afterwards.

use crate::{CoreError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Orders table.
pub const ORDERS: &str = "df_Orders";
/// Order items table.
pub const ORDER_ITEMS: &str = "df_OrderItems";
/// Customers table.
pub const CUSTOMERS: &str = "df_Customers";
/// Payments table.
pub const PAYMENTS: &str = "df_payments";
/// Products table.
pub const PRODUCTS: &str = "df_products";

/// Validation rule set assigned to a logical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Timestamped events: timeline parsing and ordering rules
    EventFact,
    /// Monetary/quantity details: non-negative numeric rules
    TransactionDetail,
    /// Reference entities: base rules only
    EntityReference,
}

impl Role {
    /// Returns the catalog name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::EventFact => "event_fact",
            Role::TransactionDetail => "transaction_detail",
            Role::EntityReference => "entity_reference",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four timestamp columns of an event-fact table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineColumns {
    /// When the order was placed
    pub purchase: String,
    /// When payment was approved
    pub approval: String,
    /// When the order reached the customer
    pub delivery: String,
    /// Promised delivery date
    pub estimated_delivery: String,
}

impl TimelineColumns {
    /// Returns the column names in declaration order.
    pub fn all(&self) -> [&str; 4] {
        [
            self.purchase.as_str(),
            self.approval.as_str(),
            self.delivery.as_str(),
            self.estimated_delivery.as_str(),
        ]
    }
}

impl Default for TimelineColumns {
    fn default() -> Self {
        Self {
            purchase: "order_purchase_timestamp".to_string(),
            approval: "order_approved_at".to_string(),
            delivery: "order_delivered_timestamp".to_string(),
            estimated_delivery: "order_estimated_delivery_date".to_string(),
        }
    }
}

/// Rules declared for one logical table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Validation role
    pub role: Role,

    /// Ordered primary-key column names
    pub primary_key: Vec<String>,

    /// Timeline columns, used by event-fact tables only
    #[serde(default)]
    pub timeline: TimelineColumns,
}

/// A named table entry in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Logical table name, also the file-name prefix
    pub name: String,

    /// Rules for the table
    #[serde(flatten)]
    pub config: TableConfig,
}

/// A referential-integrity rule between two catalogued tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub child_table: String,
    pub child_column: String,
    pub parent_table: String,
    pub parent_column: String,
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.child_table, self.child_column, self.parent_table, self.parent_column
        )
    }
}

/// The closed set of logical tables and their rules.
///
/// # Example
///
/// ```rust
/// use fulfillment_core::{RuleCatalog, Role};
///
/// let catalog = RuleCatalog::fulfillment();
/// let payments = catalog.get("df_payments").unwrap();
/// assert_eq!(payments.role, Role::TransactionDetail);
/// assert_eq!(payments.primary_key, vec!["order_id", "payment_sequential"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCatalog {
    tables: Vec<TableEntry>,

    #[serde(default)]
    references: Vec<ForeignKey>,
}

impl RuleCatalog {
    /// Creates a catalog, validating it.
    pub fn new(tables: Vec<TableEntry>, references: Vec<ForeignKey>) -> Result<Self> {
        let catalog = Self { tables, references };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The built-in order-fulfillment catalog.
    pub fn fulfillment() -> Self {
        let entry = |name: &str, role: Role, key: &[&str]| TableEntry {
            name: name.to_string(),
            config: TableConfig {
                role,
                primary_key: key.iter().map(|k| k.to_string()).collect(),
                timeline: TimelineColumns::default(),
            },
        };
        let order_ref = |child: &str| ForeignKey {
            child_table: child.to_string(),
            child_column: "order_id".to_string(),
            parent_table: ORDERS.to_string(),
            parent_column: "order_id".to_string(),
        };

        Self {
            tables: vec![
                entry(ORDERS, Role::EventFact, &["order_id"]),
                entry(ORDER_ITEMS, Role::TransactionDetail, &["order_id"]),
                entry(CUSTOMERS, Role::EntityReference, &["customer_id"]),
                entry(
                    PAYMENTS,
                    Role::TransactionDetail,
                    &["order_id", "payment_sequential"],
                ),
                entry(PRODUCTS, Role::EntityReference, &["product_id"]),
            ],
            references: vec![order_ref(ORDER_ITEMS), order_ref(PAYMENTS)],
        }
    }

    /// Checks the catalog for internal consistency.
    ///
    /// Table names must be non-empty identifiers (they are used in file-name
    /// patterns) and unique, every table needs a primary key without repeated
    /// columns, and references must name catalogued tables.
    pub fn validate(&self) -> Result<()> {
        let name_pattern = Regex::new(r"^[A-Za-z0-9_]+$")
            .map_err(|e| CoreError::InvalidCatalog(format!("invalid name pattern: {e}")))?;

        if self.tables.is_empty() {
            return Err(CoreError::InvalidCatalog(
                "catalog has no tables defined".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.tables {
            if !name_pattern.is_match(&entry.name) {
                return Err(CoreError::InvalidCatalog(format!(
                    "table name '{}' must only contain letters, digits and '_'",
                    entry.name
                )));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(CoreError::InvalidCatalog(format!(
                    "duplicate table name '{}'",
                    entry.name
                )));
            }
            if entry.config.primary_key.is_empty() {
                return Err(CoreError::InvalidCatalog(format!(
                    "table '{}' has no primary key",
                    entry.name
                )));
            }
            let mut key_columns = HashSet::new();
            if let Some(repeated) = entry
                .config
                .primary_key
                .iter()
                .find(|c| !key_columns.insert(c.as_str()))
            {
                return Err(CoreError::InvalidCatalog(format!(
                    "table '{}' repeats primary key column '{}'",
                    entry.name, repeated
                )));
            }
        }

        for reference in &self.references {
            for table in [&reference.child_table, &reference.parent_table] {
                if !seen.contains(table.as_str()) {
                    return Err(CoreError::InvalidCatalog(format!(
                        "reference {} names unknown table '{}'",
                        reference, table
                    )));
                }
            }
        }

        Ok(())
    }

    /// Gets the rules for a table.
    pub fn get(&self, name: &str) -> Option<&TableConfig> {
        self.tables
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.config)
    }

    /// Gets the rules for a table or fails with `UnknownTable`.
    pub fn require(&self, name: &str) -> Result<&TableConfig> {
        self.get(name)
            .ok_or_else(|| CoreError::UnknownTable(name.to_string()))
    }

    /// Iterates tables in declaration order.
    pub fn tables(&self) -> impl Iterator<Item = &TableEntry> {
        self.tables.iter()
    }

    /// Returns the referential-integrity rules.
    pub fn references(&self) -> &[ForeignKey] {
        &self.references
    }

    /// Returns the tables that must be present for cross-table checks, in
    /// parent-then-child order of first appearance.
    pub fn cross_table_requirements(&self) -> Vec<&str> {
        let mut required: Vec<&str> = Vec::new();
        for reference in &self.references {
            for table in [&reference.parent_table, &reference.child_table] {
                if !required.contains(&table.as_str()) {
                    required.push(table);
                }
            }
        }
        required
    }

    /// Returns the number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if the catalog has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::fulfillment()
    }
}
