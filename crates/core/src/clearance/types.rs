//! Clearance domain types.
//!
//! Statuses, the fixed request-type and approver-role vocabularies, and
//! the administrative bulk actions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall status of a clearance request.
///
/// `Pending` is the creation state. `InProgress`, `Rejected` and
/// `Completed` are derived from the approval steps; `Approved` is only
/// reachable through an administrative override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearanceStatus {
    /// Created, no approver has acted yet.
    Pending,
    /// At least one approver acted, none rejected, not all approved.
    InProgress,
    /// Approved by an administrator.
    Approved,
    /// At least one approver rejected, or rejected by an administrator.
    Rejected,
    /// Every approver approved.
    Completed,
}

impl ClearanceStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::InProgress,
        Self::Approved,
        Self::Rejected,
        Self::Completed,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Returns true if the request counts as cleared for time-to-clear purposes.
    #[must_use]
    pub const fn is_cleared(&self) -> bool {
        matches!(self, Self::Approved | Self::Completed)
    }
}

impl fmt::Display for ClearanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single approval step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Approver has not acted yet.
    Pending,
    /// Approver signed off.
    Approved,
    /// Approver refused.
    Rejected,
}

impl StepStatus {
    /// All step statuses.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a step status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a clearance request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// Enrollment clearance.
    Enrollment,
    /// Change of course.
    CourseChange,
    /// Financial aid application.
    FinancialAid,
    /// Document submission.
    DocumentSubmission,
    /// Graduation clearance.
    Graduation,
    /// Transfer out.
    Transfer,
    /// Leave of absence.
    LeaveOfAbsence,
}

impl RequestType {
    /// The full vocabulary, in display order.
    pub const ALL: [Self; 7] = [
        Self::Enrollment,
        Self::CourseChange,
        Self::FinancialAid,
        Self::DocumentSubmission,
        Self::Graduation,
        Self::Transfer,
        Self::LeaveOfAbsence,
    ];

    /// Returns the string representation of the request type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Enrollment => "enrollment",
            Self::CourseChange => "course_change",
            Self::FinancialAid => "financial_aid",
            Self::DocumentSubmission => "document_submission",
            Self::Graduation => "graduation",
            Self::Transfer => "transfer",
            Self::LeaveOfAbsence => "leave_of_absence",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Enrollment => "Enrollment",
            Self::CourseChange => "Course Change",
            Self::FinancialAid => "Financial Aid",
            Self::DocumentSubmission => "Document Submission",
            Self::Graduation => "Graduation",
            Self::Transfer => "Transfer",
            Self::LeaveOfAbsence => "Leave of Absence",
        }
    }

    /// Parses a request type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim().to_lowercase())
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approver roles offered to callers when building an approver list.
///
/// Steps store their role as free text; this is a lookup, not a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproverRole {
    /// Organization treasurer.
    OrganizationTreasurer,
    /// Organization adviser.
    OrganizationAdviser,
    /// Librarian.
    Librarian,
    /// Year level treasurer.
    YearLevelTreasurer,
    /// Program head.
    ProgramHead,
    /// Dean.
    Dean,
    /// Registrar.
    Registrar,
    /// Vice President for Student Development.
    Vpsd,
    /// Finance office.
    FinanceOffice,
    /// Scholarship office.
    ScholarshipOffice,
}

impl ApproverRole {
    /// The full vocabulary, in display order.
    pub const ALL: [Self; 10] = [
        Self::OrganizationTreasurer,
        Self::OrganizationAdviser,
        Self::Librarian,
        Self::YearLevelTreasurer,
        Self::ProgramHead,
        Self::Dean,
        Self::Registrar,
        Self::Vpsd,
        Self::FinanceOffice,
        Self::ScholarshipOffice,
    ];

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OrganizationTreasurer => "organization_treasurer",
            Self::OrganizationAdviser => "organization_adviser",
            Self::Librarian => "librarian",
            Self::YearLevelTreasurer => "year_level_treasurer",
            Self::ProgramHead => "program_head",
            Self::Dean => "dean",
            Self::Registrar => "registrar",
            Self::Vpsd => "vpsd",
            Self::FinanceOffice => "finance_office",
            Self::ScholarshipOffice => "scholarship_office",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::OrganizationTreasurer => "Organization Treasurer",
            Self::OrganizationAdviser => "Organization Adviser",
            Self::Librarian => "Librarian",
            Self::YearLevelTreasurer => "Year Level Treasurer",
            Self::ProgramHead => "Program Head",
            Self::Dean => "Dean",
            Self::Registrar => "Registrar",
            Self::Vpsd => "VPSD (Vice President for Student Development)",
            Self::FinanceOffice => "Finance Office",
            Self::ScholarshipOffice => "Scholarship Office",
        }
    }
}

/// What a presentation layer should offer for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// Read-only; nothing left to decide.
    View,
    /// Needs attention from an administrator.
    Review,
    /// Ready to issue the clearance.
    Clearance,
}

impl ActionType {
    /// Returns the string representation of the action type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Review => "review",
            Self::Clearance => "clearance",
        }
    }
}

/// Administrative bulk action over a set of requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    /// Set status to `approved`.
    Approve,
    /// Set status to `rejected` and replace notes with the remarks.
    Reject,
    /// Remove the requests permanently.
    Delete,
    /// Set status to `completed`.
    MarkComplete,
    /// Reset status to `pending`.
    MarkPending,
}

impl BulkAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Delete => "delete",
            Self::MarkComplete => "mark_complete",
            Self::MarkPending => "mark_pending",
        }
    }

    /// Parses an action from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            "delete" => Some(Self::Delete),
            "mark_complete" => Some(Self::MarkComplete),
            "mark_pending" => Some(Self::MarkPending),
            _ => None,
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
