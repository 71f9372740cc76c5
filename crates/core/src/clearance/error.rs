//! Clearance error types.
//!
//! Every fallible clearance operation returns one of these. The HTTP
//! layer renders them from `status_code` and `error_code`.

use clearance_shared::types::id::{ApprovalStepId, ClearanceId, StudentId};
use thiserror::Error;

/// Errors that can occur during clearance operations.
#[derive(Debug, Error)]
pub enum ClearanceError {
    /// Input failed validation; nothing was written.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Clearance request not found (or soft-deleted).
    #[error("Clearance {0} not found")]
    ClearanceNotFound(ClearanceId),

    /// The step does not exist or belongs to a different clearance.
    #[error("Approval step {step_id} not found on clearance {clearance_id}")]
    StepNotFound {
        /// The clearance the caller addressed.
        clearance_id: ClearanceId,
        /// The step the caller addressed.
        step_id: ApprovalStepId,
    },

    /// Student not found.
    #[error("Student {0} not found")]
    StudentNotFound(StudentId),

    /// The caller lacks the administrative capability.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A multi-row write failed and was rolled back.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ClearanceError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Forbidden(_) => 403,
            Self::ClearanceNotFound(_) | Self::StepNotFound { .. } | Self::StudentNotFound(_) => {
                404
            }
            Self::Conflict(_) => 409,
            Self::TransactionFailed(_) | Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::ClearanceNotFound(_) => "CLEARANCE_NOT_FOUND",
            Self::StepNotFound { .. } => "STEP_NOT_FOUND",
            Self::StudentNotFound(_) => "STUDENT_NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::TransactionFailed(_) => "TRANSACTION_FAILED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
