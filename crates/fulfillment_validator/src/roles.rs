//! Role dispatch.
//!
//! Each [`Role`] has exactly one [`RoleValidator`]; the orchestrator looks it
//! up with [`validator_for`] after base validation admitted the table.

use crate::{EventFactValidator, TransactionDetailValidator};
use fulfillment_core::{Role, Table, TableConfig, ValidationReport};

/// Role-specific rules applied after base validation.
pub trait RoleValidator: Send + Sync {
    /// The role this validator implements.
    fn role(&self) -> Role;

    /// Validates `table` against the rules of its role.
    fn validate(&self, table: &Table, config: &TableConfig, report: &mut ValidationReport);
}

/// Reference entities carry no rules beyond base validation.
#[derive(Debug, Default, Clone, Copy)]
pub struct EntityReferenceValidator;

impl RoleValidator for EntityReferenceValidator {
    fn role(&self) -> Role {
        Role::EntityReference
    }

    fn validate(&self, _table: &Table, _config: &TableConfig, _report: &mut ValidationReport) {}
}

static EVENT_FACT: EventFactValidator = EventFactValidator;
static TRANSACTION_DETAIL: TransactionDetailValidator = TransactionDetailValidator;
static ENTITY_REFERENCE: EntityReferenceValidator = EntityReferenceValidator;

/// Returns the validator for `role`.
pub fn validator_for(role: Role) -> &'static dyn RoleValidator {
    match role {
        Role::EventFact => &EVENT_FACT,
        Role::TransactionDetail => &TRANSACTION_DETAIL,
        Role::EntityReference => &ENTITY_REFERENCE,
    }
}
