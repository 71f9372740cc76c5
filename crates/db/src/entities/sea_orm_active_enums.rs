//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use clearance_core::clearance::types as core;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "clearance_status")]
#[serde(rename_all = "snake_case")]
pub enum ClearanceStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "completed")]
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "approval_step_status")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStepStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "request_type")]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    #[sea_orm(string_value = "enrollment")]
    Enrollment,
    #[sea_orm(string_value = "course_change")]
    CourseChange,
    #[sea_orm(string_value = "financial_aid")]
    FinancialAid,
    #[sea_orm(string_value = "document_submission")]
    DocumentSubmission,
    #[sea_orm(string_value = "graduation")]
    Graduation,
    #[sea_orm(string_value = "transfer")]
    Transfer,
    #[sea_orm(string_value = "leave_of_absence")]
    LeaveOfAbsence,
}

impl From<ClearanceStatus> for core::ClearanceStatus {
    fn from(status: ClearanceStatus) -> Self {
        match status {
            ClearanceStatus::Pending => Self::Pending,
            ClearanceStatus::InProgress => Self::InProgress,
            ClearanceStatus::Approved => Self::Approved,
            ClearanceStatus::Rejected => Self::Rejected,
            ClearanceStatus::Completed => Self::Completed,
        }
    }
}

impl From<core::ClearanceStatus> for ClearanceStatus {
    fn from(status: core::ClearanceStatus) -> Self {
        match status {
            core::ClearanceStatus::Pending => Self::Pending,
            core::ClearanceStatus::InProgress => Self::InProgress,
            core::ClearanceStatus::Approved => Self::Approved,
            core::ClearanceStatus::Rejected => Self::Rejected,
            core::ClearanceStatus::Completed => Self::Completed,
        }
    }
}

impl From<ApprovalStepStatus> for core::StepStatus {
    fn from(status: ApprovalStepStatus) -> Self {
        match status {
            ApprovalStepStatus::Pending => Self::Pending,
            ApprovalStepStatus::Approved => Self::Approved,
            ApprovalStepStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<core::StepStatus> for ApprovalStepStatus {
    fn from(status: core::StepStatus) -> Self {
        match status {
            core::StepStatus::Pending => Self::Pending,
            core::StepStatus::Approved => Self::Approved,
            core::StepStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<RequestType> for core::RequestType {
    fn from(request_type: RequestType) -> Self {
        match request_type {
            RequestType::Enrollment => Self::Enrollment,
            RequestType::CourseChange => Self::CourseChange,
            RequestType::FinancialAid => Self::FinancialAid,
            RequestType::DocumentSubmission => Self::DocumentSubmission,
            RequestType::Graduation => Self::Graduation,
            RequestType::Transfer => Self::Transfer,
            RequestType::LeaveOfAbsence => Self::LeaveOfAbsence,
        }
    }
}

impl From<core::RequestType> for RequestType {
    fn from(request_type: core::RequestType) -> Self {
        match request_type {
            core::RequestType::Enrollment => Self::Enrollment,
            core::RequestType::CourseChange => Self::CourseChange,
            core::RequestType::FinancialAid => Self::FinancialAid,
            core::RequestType::DocumentSubmission => Self::DocumentSubmission,
            core::RequestType::Graduation => Self::Graduation,
            core::RequestType::Transfer => Self::Transfer,
            core::RequestType::LeaveOfAbsence => Self::LeaveOfAbsence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion_round_trips() {
        for status in core::ClearanceStatus::ALL {
            let db: ClearanceStatus = status.into();
            assert_eq!(core::ClearanceStatus::from(db), status);
            assert_eq!(db.to_value(), status.as_str());
        }
    }

    #[test]
    fn test_step_status_db_values() {
        for status in core::StepStatus::ALL {
            let db: ApprovalStepStatus = status.into();
            assert_eq!(db.to_value(), status.as_str());
        }
    }

    #[test]
    fn test_request_type_db_values() {
        for request_type in core::RequestType::ALL {
            let db: RequestType = request_type.into();
            assert_eq!(db.to_value(), request_type.as_str());
            assert_eq!(core::RequestType::from(db), request_type);
        }
    }
}
