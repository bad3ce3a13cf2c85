//! # Fulfillment Contracts Core
//!
//! Core data structures for validating and contract-enforcing raw
//! order-fulfillment data before it reaches the assembly pipeline.
//!
//! ## Key Concepts
//!
//! - **Table**: ordered columns and rows of typed [`Cell`]s, assembled from one
//!   or more physical files
//! - **Role**: the rule set a table is checked with (`event_fact`,
//!   `transaction_detail`, `entity_reference`)
//! - **RuleCatalog**: the closed mapping from logical table name to role and
//!   primary key, plus the foreign-key references checked across tables
//! - **ValidationReport**: append-only errors / warnings / info channels
//!
//! ## Example
//!
//! ```rust
//! use fulfillment_core::{Cell, RuleCatalog, Role, TableBuilder, ValidationReport};
//!
//! let catalog = RuleCatalog::fulfillment();
//! let orders = catalog.get("df_Orders").unwrap();
//! assert_eq!(orders.role, Role::EventFact);
//!
//! let table = TableBuilder::new("df_Customers", ["customer_id", "customer_city"])
//!     .row([Cell::from("c1"), Cell::from("sao paulo")])
//!     .build()
//!     .unwrap();
//! assert_eq!(table.num_rows(), 1);
//!
//! let mut report = ValidationReport::new();
//! report.add_info("df_Customers: 1 row loaded");
//! assert!(report.passed());
//! ```

pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod report;
pub mod storage;
pub mod table;

pub use builder::*;
pub use catalog::*;
pub use config::*;
pub use error::*;
pub use report::*;
pub use storage::*;
pub use table::*;
