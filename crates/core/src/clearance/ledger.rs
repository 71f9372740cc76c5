//! Approver ledger rules.
//!
//! A clearance request owns an ordered list of approval steps. Positions
//! are 1-based and only fix display order; any step may be decided at
//! any time.

use chrono::{DateTime, Utc};
use clearance_shared::types::id::{ApprovalStepId, ClearanceId};
use serde::{Deserialize, Serialize};

use crate::clearance::error::ClearanceError;
use crate::clearance::types::StepStatus;

/// One requested approver, as supplied on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproverInput {
    /// Role label (free text, usually an [`ApproverRole`](crate::clearance::ApproverRole) key).
    pub role: String,
    /// Display name of the approver.
    pub name: String,
}

impl ApproverInput {
    /// Creates an approver input.
    pub fn new(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            name: name.into(),
        }
    }
}

/// A step ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    /// 1-based position within the request.
    pub position: i32,
    /// Trimmed role label.
    pub role: String,
    /// Trimmed display name.
    pub name: String,
    /// Always [`StepStatus::Pending`].
    pub status: StepStatus,
}

/// Field values to persist after a step decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepChange {
    /// New step status.
    pub status: StepStatus,
    /// Remarks exactly as supplied.
    pub remarks: Option<String>,
    /// Set only when the step is approved.
    pub approved_at: Option<DateTime<Utc>>,
}

/// Stateless rules for creating and updating approval steps.
pub struct ApproverLedger;

impl ApproverLedger {
    /// Turns the ordered approver list into pending steps.
    ///
    /// # Errors
    ///
    /// Returns `ClearanceError::Validation` if the list is empty or any
    /// role or name is blank.
    pub fn plan_steps(approvers: &[ApproverInput]) -> Result<Vec<PlannedStep>, ClearanceError> {
        if approvers.is_empty() {
            return Err(ClearanceError::Validation(
                "at least one approver is required".to_string(),
            ));
        }

        approvers
            .iter()
            .enumerate()
            .map(|(idx, approver)| {
                let role = approver.role.trim();
                let name = approver.name.trim();
                if role.is_empty() {
                    return Err(ClearanceError::Validation(format!(
                        "approvers[{idx}].role must not be blank"
                    )));
                }
                if name.is_empty() {
                    return Err(ClearanceError::Validation(format!(
                        "approvers[{idx}].name must not be blank"
                    )));
                }
                let position = i32::try_from(idx + 1).map_err(|_| {
                    ClearanceError::Validation("too many approvers".to_string())
                })?;
                Ok(PlannedStep {
                    position,
                    role: role.to_string(),
                    name: name.to_string(),
                    status: StepStatus::Pending,
                })
            })
            .collect()
    }

    /// Computes the persisted fields for a step decision.
    #[must_use]
    pub fn apply_update(
        new_status: StepStatus,
        remarks: Option<String>,
        now: DateTime<Utc>,
    ) -> StepChange {
        let approved_at = (new_status == StepStatus::Approved).then_some(now);

        StepChange {
            status: new_status,
            remarks,
            approved_at,
        }
    }

    /// Checks that a loaded step belongs to the addressed request.
    ///
    /// # Errors
    ///
    /// Returns `ClearanceError::StepNotFound` when the owner differs.
    pub fn ensure_owned_by(
        owner: ClearanceId,
        clearance_id: ClearanceId,
        step_id: ApprovalStepId,
    ) -> Result<(), ClearanceError> {
        if owner == clearance_id {
            Ok(())
        } else {
            Err(ClearanceError::StepNotFound {
                clearance_id,
                step_id,
            })
        }
    }
}
