//! Report inputs and outputs.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::clearance::types::{ClearanceStatus, RequestType, StepStatus};
use crate::reports::error::ReportError;
use crate::reports::period::Granularity;

/// Inclusive date range on a request's creation date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First included day.
    pub from: Option<NaiveDate>,
    /// Last included day.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range, rejecting `from > to`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` when the bounds are reversed.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, ReportError> {
        if let (Some(start), Some(end)) = (from, to) {
            if start > end {
                return Err(ReportError::InvalidDateRange { start, end });
            }
        }
        Ok(Self { from, to })
    }

    /// Returns true if the timestamp's UTC date falls inside the range.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }
}

/// Filters shared by every report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    /// Creation date range.
    pub range: DateRange,
    /// Exact overall status.
    pub status: Option<ClearanceStatus>,
    /// Exact request type.
    pub request_type: Option<RequestType>,
}

impl ReportFilter {
    /// Builds a filter from raw query values.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidFilter` for unknown status or request
    /// type values and `ReportError::InvalidDateRange` for reversed bounds.
    pub fn from_query(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        status: Option<&str>,
        request_type: Option<&str>,
    ) -> Result<Self, ReportError> {
        let status = status
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                ClearanceStatus::parse(s)
                    .ok_or_else(|| ReportError::InvalidFilter(format!("unknown status '{s}'")))
            })
            .transpose()?;
        let request_type = request_type
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                RequestType::parse(s).ok_or_else(|| {
                    ReportError::InvalidFilter(format!("unknown request type '{s}'"))
                })
            })
            .transpose()?;

        Ok(Self {
            range: DateRange::new(from, to)?,
            status,
            request_type,
        })
    }

    /// Returns true if a request with these attributes passes the filter.
    #[must_use]
    pub fn matches(
        &self,
        created_at: DateTime<Utc>,
        status: ClearanceStatus,
        request_type: RequestType,
    ) -> bool {
        self.range.contains(created_at)
            && self.status.is_none_or(|s| s == status)
            && self.request_type.is_none_or(|t| t == request_type)
    }
}

/// Parses a grouping parameter, defaulting to monthly.
///
/// # Errors
///
/// Returns `ReportError::InvalidFilter` for unknown values.
pub fn parse_granularity(raw: Option<&str>) -> Result<Granularity, ReportError> {
    match raw.filter(|s| !s.trim().is_empty()) {
        None => Ok(Granularity::default()),
        Some(s) => Granularity::parse(s)
            .ok_or_else(|| ReportError::InvalidFilter(format!("unknown group_by '{s}'"))),
    }
}

/// The slice of a clearance request the reports read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearanceRecord {
    /// Overall status.
    pub status: ClearanceStatus,
    /// Request type.
    pub request_type: RequestType,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Submission time.
    pub submitted_at: Option<DateTime<Utc>>,
    /// Approval time.
    pub approved_at: Option<DateTime<Utc>>,
}

impl ClearanceRecord {
    /// Whole days from submission to approval, for approved requests only.
    #[must_use]
    pub fn days_to_clear(&self) -> Option<i64> {
        if self.status != ClearanceStatus::Approved {
            return None;
        }
        let submitted = self.submitted_at?;
        let approved = self.approved_at?;
        Some((approved.date_naive() - submitted.date_naive()).num_days())
    }
}

/// An approval step together with the parent attributes reports filter on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Role label.
    pub role: String,
    /// Step status.
    pub status: StepStatus,
    /// Step creation time.
    pub created_at: DateTime<Utc>,
    /// Step approval time.
    pub approved_at: Option<DateTime<Utc>>,
    /// Parent creation time.
    pub clearance_created_at: DateTime<Utc>,
    /// Parent overall status.
    pub clearance_status: ClearanceStatus,
    /// Parent request type.
    pub clearance_request_type: RequestType,
}

impl StepRecord {
    /// Whole days from step creation to approval.
    #[must_use]
    pub fn processing_days(&self) -> Option<i64> {
        self.approved_at
            .map(|approved| (approved.date_naive() - self.created_at.date_naive()).num_days())
    }
}

/// Headline counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearanceMetrics {
    /// Requests matching the filter.
    pub total: u64,
    /// Status `approved`.
    pub approved: u64,
    /// Status `pending`.
    pub pending: u64,
    /// Status `in_progress`.
    pub in_progress: u64,
    /// Status `rejected`.
    pub rejected: u64,
    /// Status `completed`.
    pub completed: u64,
    /// `approved / total * 100`, 2dp.
    pub approval_rate: Decimal,
    /// Mean days to clear over approved requests, 2dp.
    pub average_time_to_clear: Decimal,
}

/// Time-to-clear statistics for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeToClearBucket {
    /// Period label.
    pub period: String,
    /// Period start.
    pub period_start: NaiveDate,
    /// Approved requests in the period.
    pub total_cleared: u64,
    /// Mean days, 2dp.
    pub average_days: Decimal,
    /// Fastest clearance.
    pub minimum_days: i64,
    /// Slowest clearance.
    pub maximum_days: i64,
}

/// Status counts for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendBucket {
    /// Period label.
    pub period: String,
    /// Period start.
    pub period_start: NaiveDate,
    /// Requests created in the period.
    pub total: u64,
    /// Of which approved.
    pub approved: u64,
    /// Of which pending.
    pub pending: u64,
    /// Of which rejected.
    pub rejected: u64,
}

/// Counts for one request type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    /// Request type.
    pub request_type: RequestType,
    /// Display label.
    pub label: String,
    /// Requests of this type.
    pub total: u64,
    /// Of which approved.
    pub approved: u64,
    /// Of which pending.
    pub pending: u64,
    /// Of which rejected.
    pub rejected: u64,
}

/// Count for one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    /// Overall status.
    pub status: ClearanceStatus,
    /// Requests in that status.
    pub count: u64,
}

/// Created/approved counts for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// `YYYY-MM`.
    pub month: String,
    /// Requests created in the month.
    pub total: u64,
    /// Of which approved.
    pub approved: u64,
}

/// Breakdown by type, status and month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedStatistics {
    /// Per request type, in vocabulary order.
    pub by_type: Vec<TypeBreakdown>,
    /// Per status, in lifecycle order.
    pub by_status: Vec<StatusCount>,
    /// Up to the 12 most recent months, oldest first.
    pub monthly_trends: Vec<MonthlyTrend>,
}

/// Throughput of one approver role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationPerformance {
    /// Role label.
    pub organization: String,
    /// Steps assigned to the role.
    pub total_processed: u64,
    /// Approved steps.
    pub cleared: u64,
    /// Pending steps.
    pub pending: u64,
    /// Rejected steps.
    pub not_cleared: u64,
    /// `cleared / total_processed * 100`, 2dp.
    pub clearance_rate: Decimal,
    /// Mean days from step creation to approval, 2dp.
    pub avg_processing_days: Decimal,
}
