//! Overall status derivation.
//!
//! The request status is stored, but outside of creation and the
//! administrative bulk overrides it is only ever written with the value
//! [`StatusEngine::recompute`] returns for the current step statuses.

use chrono::{DateTime, Utc};

use crate::clearance::error::ClearanceError;
use crate::clearance::types::{ActionType, BulkAction, ClearanceStatus, StepStatus};

/// What happens to the notes field under a bulk action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesUpdate {
    /// Leave notes untouched.
    Keep,
    /// Overwrite notes (possibly with nothing).
    Replace(Option<String>),
}

/// Effect of a bulk action on a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOutcome {
    /// Overwrite status (and possibly notes).
    SetStatus {
        /// Status to write.
        status: ClearanceStatus,
        /// Notes handling.
        notes: NotesUpdate,
    },
    /// Remove the request and its steps permanently.
    Delete,
}

/// Stateless engine for clearance status rules.
pub struct StatusEngine;

impl StatusEngine {
    /// Derives the overall status from the current step statuses.
    ///
    /// Precedence: all approved gives `completed`, otherwise any rejected
    /// gives `rejected`, otherwise `in_progress`. Step order is irrelevant.
    ///
    /// # Errors
    ///
    /// Returns `ClearanceError::Validation` for an empty step list.
    pub fn recompute(steps: &[StepStatus]) -> Result<ClearanceStatus, ClearanceError> {
        if steps.is_empty() {
            return Err(ClearanceError::Validation(
                "cannot derive status from zero approval steps".to_string(),
            ));
        }

        if steps.iter().all(|s| *s == StepStatus::Approved) {
            Ok(ClearanceStatus::Completed)
        } else if steps.contains(&StepStatus::Rejected) {
            Ok(ClearanceStatus::Rejected)
        } else {
            Ok(ClearanceStatus::InProgress)
        }
    }

    /// Classifies a request for presentation.
    #[must_use]
    pub fn determine_action_type(status: ClearanceStatus, steps: &[StepStatus]) -> ActionType {
        match status {
            ClearanceStatus::Completed => ActionType::View,
            ClearanceStatus::Rejected => {
                if steps.iter().all(|s| *s == StepStatus::Rejected) {
                    ActionType::View
                } else {
                    ActionType::Review
                }
            }
            ClearanceStatus::Pending | ClearanceStatus::InProgress => ActionType::Review,
            ClearanceStatus::Approved => ActionType::Clearance,
        }
    }

    /// Maps a bulk action to its per-request effect.
    #[must_use]
    pub fn apply_bulk_action(action: BulkAction, remarks: Option<&str>) -> BulkOutcome {
        let set = |status| BulkOutcome::SetStatus {
            status,
            notes: NotesUpdate::Keep,
        };

        match action {
            BulkAction::Approve => set(ClearanceStatus::Approved),
            BulkAction::Reject => BulkOutcome::SetStatus {
                status: ClearanceStatus::Rejected,
                notes: NotesUpdate::Replace(remarks.map(str::to_string)),
            },
            BulkAction::MarkComplete => set(ClearanceStatus::Completed),
            BulkAction::MarkPending => set(ClearanceStatus::Pending),
            BulkAction::Delete => BulkOutcome::Delete,
        }
    }

    /// Request approval timestamp after a status change.
    ///
    /// Stamped on entry into `approved`/`completed`, kept while staying
    /// there, cleared on leaving.
    #[must_use]
    pub fn approval_timestamp(
        previous: ClearanceStatus,
        next: ClearanceStatus,
        current: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        if !next.is_cleared() {
            None
        } else if previous.is_cleared() {
            current.or(Some(now))
        } else {
            Some(now)
        }
    }
}
