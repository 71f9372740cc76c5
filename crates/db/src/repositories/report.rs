//! Report repository.
//!
//! Loads the rows a report needs, with the filter pushed into SQL, and
//! hands them to the pure `ReportService`.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::debug;

use clearance_core::clearance::AdminCapability;
use clearance_core::reports::{
    ClearanceMetrics, ClearanceRecord, DetailedStatistics, Granularity, OrganizationPerformance,
    ReportError, ReportFilter, ReportService, StepRecord, TimeToClearBucket, TrendBucket,
};

use crate::entities::{clearance_approvers, clearances, sea_orm_active_enums};

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Headline metrics.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Database` if loading fails.
    pub async fn get_metrics(
        &self,
        cap: &AdminCapability,
        filter: &ReportFilter,
    ) -> Result<ClearanceMetrics, ReportError> {
        let records = self.load_clearances(cap, filter).await?;
        Ok(ReportService::get_metrics(&records, filter))
    }

    /// Time-to-clear per period.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Database` if loading fails.
    pub async fn get_time_to_clear_statistics(
        &self,
        cap: &AdminCapability,
        filter: &ReportFilter,
        granularity: Granularity,
    ) -> Result<Vec<TimeToClearBucket>, ReportError> {
        let records = self.load_clearances(cap, filter).await?;
        Ok(ReportService::get_time_to_clear_statistics(
            &records,
            filter,
            granularity,
        ))
    }

    /// Breakdown by type, status and month.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Database` if loading fails.
    pub async fn get_detailed_statistics(
        &self,
        cap: &AdminCapability,
        filter: &ReportFilter,
    ) -> Result<DetailedStatistics, ReportError> {
        let records = self.load_clearances(cap, filter).await?;
        Ok(ReportService::get_detailed_statistics(&records, filter))
    }

    /// Per approver role throughput.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Database` if loading fails.
    pub async fn get_organization_performance(
        &self,
        cap: &AdminCapability,
        filter: &ReportFilter,
    ) -> Result<Vec<OrganizationPerformance>, ReportError> {
        let rows = apply_filter(
            clearance_approvers::Entity::find().find_also_related(clearances::Entity),
            filter,
        )
        .all(&self.db)
        .await
        .map_err(|e| ReportError::Database(e.to_string()))?;

        let steps: Vec<StepRecord> = rows
            .into_iter()
            .filter_map(|(step, parent)| {
                let parent = parent?;
                Some(StepRecord {
                    role: step.approver_role,
                    status: step.status.into(),
                    created_at: step.created_at.to_utc(),
                    approved_at: step.approved_at.map(|t| t.to_utc()),
                    clearance_created_at: parent.created_at.to_utc(),
                    clearance_status: parent.status.into(),
                    clearance_request_type: parent.request_type.into(),
                })
            })
            .collect();

        debug!(admin = %cap.user_id(), steps = steps.len(), "Loaded approval steps for report");
        Ok(ReportService::get_organization_performance(&steps, filter))
    }

    /// Status counts per period.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Database` if loading fails.
    pub async fn get_trends(
        &self,
        cap: &AdminCapability,
        filter: &ReportFilter,
        granularity: Granularity,
    ) -> Result<Vec<TrendBucket>, ReportError> {
        let records = self.load_clearances(cap, filter).await?;
        Ok(ReportService::get_trends(&records, filter, granularity))
    }

    async fn load_clearances(
        &self,
        cap: &AdminCapability,
        filter: &ReportFilter,
    ) -> Result<Vec<ClearanceRecord>, ReportError> {
        let rows = apply_filter(clearances::Entity::find(), filter)
            .all(&self.db)
            .await
            .map_err(|e| ReportError::Database(e.to_string()))?;

        debug!(admin = %cap.user_id(), rows = rows.len(), "Loaded clearances for report");

        Ok(rows
            .into_iter()
            .map(|c| ClearanceRecord {
                status: c.status.into(),
                request_type: c.request_type.into(),
                created_at: c.created_at.to_utc(),
                submitted_at: c.submitted_at.map(|t| t.to_utc()),
                approved_at: c.approved_at.map(|t| t.to_utc()),
            })
            .collect())
    }
}

/// Adds the live-row and filter conditions on `clearances` columns.
fn apply_filter<Q: QueryFilter>(mut query: Q, filter: &ReportFilter) -> Q {
    query = query.filter(clearances::Column::DeletedAt.is_null());

    if let Some(from) = filter.range.from {
        query = query.filter(clearances::Column::CreatedAt.gte(start_of(from)));
    }
    // No upper bound when the day after `to` is past the last representable date.
    if let Some(next_day) = filter.range.to.and_then(|to| to.checked_add_days(Days::new(1))) {
        query = query.filter(clearances::Column::CreatedAt.lt(start_of(next_day)));
    }
    if let Some(status) = filter.status {
        query = query.filter(
            clearances::Column::Status.eq(sea_orm_active_enums::ClearanceStatus::from(status)),
        );
    }
    if let Some(request_type) = filter.request_type {
        query = query.filter(
            clearances::Column::RequestType
                .eq(sea_orm_active_enums::RequestType::from(request_type)),
        );
    }
    query
}

fn start_of(day: NaiveDate) -> DateTime<FixedOffset> {
    day.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_start_of_is_utc_midnight() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let start = start_of(day);
        assert_eq!(start.to_rfc3339(), "2025-03-14T00:00:00+00:00");
    }

    fn filter_sql(filter: &ReportFilter) -> String {
        apply_filter(clearances::Entity::find(), filter)
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_apply_filter_bounds_inclusive_range() {
        let filter = ReportFilter::from_query(
            NaiveDate::from_ymd_opt(2025, 1, 1),
            NaiveDate::from_ymd_opt(2025, 1, 31),
            None,
            None,
        )
        .unwrap();
        let sql = filter_sql(&filter);
        assert!(sql.contains("\"created_at\" >= '2025-01-01"), "{sql}");
        assert!(sql.contains("\"created_at\" < '2025-02-01"), "{sql}");
    }

    #[test]
    fn test_apply_filter_last_representable_date_has_no_upper_bound() {
        let filter = ReportFilter::from_query(None, Some(NaiveDate::MAX), None, None).unwrap();
        let sql = filter_sql(&filter);
        assert!(sql.contains("\"deleted_at\" IS NULL"), "{sql}");
        assert!(!sql.contains("\"created_at\" <"), "{sql}");
    }
}
