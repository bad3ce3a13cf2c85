//! # Fulfillment Validator
//!
//! Validation and contract-enforcement engine for raw fulfillment tables.
//! This crate provides:
//!
//! - Base validation (emptiness, duplicate columns, primary-key integrity)
//! - Role validation (`event_fact` timelines, `transaction_detail` numerics)
//! - Cross-table referential integrity (orphan detection)
//! - Contract enforcement, which strips violating rows into a new table
//! - An async orchestrator running partitions × tables over a [`TableSource`]
//!
//! Every rule writes to a [`ValidationReport`]; none of them fail with an error.
//!
//! ## Example
//!
//! ```rust
//! use fulfillment_core::{Cell, RuleCatalog, TableBuilder, ValidationReport};
//! use fulfillment_validator::{validator_for, BaseValidator};
//!
//! let catalog = RuleCatalog::fulfillment();
//! let config = catalog.get("df_products").unwrap();
//! let table = TableBuilder::new("df_products", ["product_id", "product_weight_g"])
//!     .row([Cell::from("p1"), Cell::Int(300)])
//!     .row([Cell::from("p1"), Cell::Int(250)])
//!     .build()
//!     .unwrap();
//!
//! let mut report = ValidationReport::new();
//! if BaseValidator::new().validate(&table, &config.primary_key, &mut report) {
//!     validator_for(config.role).validate(&table, config, &mut report);
//! }
//!
//! assert_eq!(report.errors(), &["df_products: 1 duplicated primary key value(s)".to_string()]);
//! ```
//!
//! [`TableSource`]: fulfillment_core::TableSource
//! [`ValidationReport`]: fulfillment_core::ValidationReport

mod base;
mod cross_table;
mod enforcer;
mod error;
mod event_fact;
mod keys;
mod orchestrator;
mod roles;
mod timestamp;
mod transaction_detail;

pub use base::*;
pub use cross_table::*;
pub use enforcer::*;
pub use error::*;
pub use event_fact::*;
pub use orchestrator::*;
pub use roles::*;
pub use timestamp::*;
pub use transaction_detail::*;
