//! Clearance request lifecycle management.
//!
//! This module implements the approver ledger, the overall status engine
//! derived from it, and the explicit admin capability that gates every
//! mutating operation.
//!
//! # Modules
//!
//! - `types` - Domain vocabularies (statuses, request types, approver roles)
//! - `error` - Clearance-specific error types
//! - `ledger` - Approval step creation and update rules
//! - `status` - Overall status derivation and admin overrides
//! - `authz` - Caller identity and admin capability

pub mod authz;
pub mod error;
pub mod ledger;
pub mod status;
pub mod types;

#[cfg(test)]
mod status_props;

pub use authz::{AdminCapability, Caller, CallerRole};
pub use error::ClearanceError;
pub use ledger::{ApproverInput, ApproverLedger, PlannedStep, StepChange};
pub use status::{BulkOutcome, NotesUpdate, StatusEngine};
pub use types::{ActionType, ApproverRole, BulkAction, ClearanceStatus, RequestType, StepStatus};
