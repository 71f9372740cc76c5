//! Report generation service.
//!
//! Every function here is a pure fold over the supplied records, so the
//! result does not depend on row order.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use super::period::{Granularity, Period};
use super::types::{
    ClearanceMetrics, ClearanceRecord, DetailedStatistics, MonthlyTrend, OrganizationPerformance,
    ReportFilter, StatusCount, StepRecord, TimeToClearBucket, TrendBucket, TypeBreakdown,
};
use crate::clearance::types::{ClearanceStatus, RequestType, StepStatus};

/// Months kept in the detailed statistics trend.
const MONTHLY_TREND_CAP: usize = 12;

/// Service for generating clearance reports.
pub struct ReportService;

impl ReportService {
    /// Counts by status, approval rate and average time to clear.
    #[must_use]
    pub fn get_metrics(records: &[ClearanceRecord], filter: &ReportFilter) -> ClearanceMetrics {
        let mut metrics = ClearanceMetrics {
            total: 0,
            approved: 0,
            pending: 0,
            in_progress: 0,
            rejected: 0,
            completed: 0,
            approval_rate: Decimal::ZERO,
            average_time_to_clear: Decimal::ZERO,
        };
        let mut cleared_days = Vec::new();

        for record in Self::filtered(records, filter) {
            metrics.total += 1;
            match record.status {
                ClearanceStatus::Approved => metrics.approved += 1,
                ClearanceStatus::Pending => metrics.pending += 1,
                ClearanceStatus::InProgress => metrics.in_progress += 1,
                ClearanceStatus::Rejected => metrics.rejected += 1,
                ClearanceStatus::Completed => metrics.completed += 1,
            }
            if let Some(days) = record.days_to_clear() {
                cleared_days.push(days);
            }
        }

        metrics.approval_rate = percentage(metrics.approved, metrics.total);
        metrics.average_time_to_clear = average(&cleared_days);
        metrics
    }

    /// Time to clear per period of approval.
    #[must_use]
    pub fn get_time_to_clear_statistics(
        records: &[ClearanceRecord],
        filter: &ReportFilter,
        granularity: Granularity,
    ) -> Vec<TimeToClearBucket> {
        let mut buckets: BTreeMap<NaiveDate, (String, Vec<i64>)> = BTreeMap::new();

        for record in Self::filtered(records, filter) {
            let (Some(days), Some(approved_at)) = (record.days_to_clear(), record.approved_at)
            else {
                continue;
            };
            let Period { start, label } = granularity.bucket(approved_at);
            buckets
                .entry(start)
                .or_insert_with(|| (label, Vec::new()))
                .1
                .push(days);
        }

        keep_recent(buckets, granularity.cap())
            .map(|(start, (label, days))| TimeToClearBucket {
                period: label,
                period_start: start,
                total_cleared: days.len() as u64,
                average_days: average(&days),
                minimum_days: days.iter().copied().min().unwrap_or_default(),
                maximum_days: days.iter().copied().max().unwrap_or_default(),
            })
            .collect()
    }

    /// Breakdown by request type, by status, and monthly creation trend.
    #[must_use]
    pub fn get_detailed_statistics(
        records: &[ClearanceRecord],
        filter: &ReportFilter,
    ) -> DetailedStatistics {
        let mut by_type: BTreeMap<RequestType, TypeBreakdown> = BTreeMap::new();
        let mut by_status: BTreeMap<ClearanceStatus, u64> = BTreeMap::new();
        let mut months: BTreeMap<NaiveDate, MonthlyTrend> = BTreeMap::new();

        for record in Self::filtered(records, filter) {
            let approved = u64::from(record.status == ClearanceStatus::Approved);

            let entry = by_type
                .entry(record.request_type)
                .or_insert_with(|| TypeBreakdown {
                    request_type: record.request_type,
                    label: record.request_type.label().to_string(),
                    total: 0,
                    approved: 0,
                    pending: 0,
                    rejected: 0,
                });
            entry.total += 1;
            entry.approved += approved;
            entry.pending += u64::from(record.status == ClearanceStatus::Pending);
            entry.rejected += u64::from(record.status == ClearanceStatus::Rejected);

            *by_status.entry(record.status).or_default() += 1;

            let Period { start, label } = Granularity::Month.bucket(record.created_at);
            let month = months.entry(start).or_insert_with(|| MonthlyTrend {
                month: label,
                total: 0,
                approved: 0,
            });
            month.total += 1;
            month.approved += approved;
        }

        DetailedStatistics {
            by_type: by_type.into_values().collect(),
            by_status: by_status
                .into_iter()
                .map(|(status, count)| StatusCount { status, count })
                .collect(),
            monthly_trends: keep_recent(months, MONTHLY_TREND_CAP)
                .map(|(_, trend)| trend)
                .collect(),
        }
    }

    /// Throughput per approver role label, ordered by label.
    ///
    /// The filter applies to each step's parent request.
    #[must_use]
    pub fn get_organization_performance(
        steps: &[StepRecord],
        filter: &ReportFilter,
    ) -> Vec<OrganizationPerformance> {
        let mut by_role: BTreeMap<&str, (OrganizationPerformance, Vec<i64>)> = BTreeMap::new();

        let matching = steps.iter().filter(|s| {
            filter.matches(
                s.clearance_created_at,
                s.clearance_status,
                s.clearance_request_type,
            )
        });

        for step in matching {
            let (perf, days) = by_role.entry(step.role.as_str()).or_insert_with(|| {
                (
                    OrganizationPerformance {
                        organization: step.role.clone(),
                        total_processed: 0,
                        cleared: 0,
                        pending: 0,
                        not_cleared: 0,
                        clearance_rate: Decimal::ZERO,
                        avg_processing_days: Decimal::ZERO,
                    },
                    Vec::new(),
                )
            });
            perf.total_processed += 1;
            match step.status {
                StepStatus::Approved => perf.cleared += 1,
                StepStatus::Pending => perf.pending += 1,
                StepStatus::Rejected => perf.not_cleared += 1,
            }
            if let Some(d) = step.processing_days() {
                days.push(d);
            }
        }

        by_role
            .into_values()
            .map(|(mut perf, days)| {
                perf.clearance_rate = percentage(perf.cleared, perf.total_processed);
                perf.avg_processing_days = average(&days);
                perf
            })
            .collect()
    }

    /// Status counts per period of creation.
    #[must_use]
    pub fn get_trends(
        records: &[ClearanceRecord],
        filter: &ReportFilter,
        granularity: Granularity,
    ) -> Vec<TrendBucket> {
        let mut buckets: BTreeMap<NaiveDate, TrendBucket> = BTreeMap::new();

        for record in Self::filtered(records, filter) {
            let Period { start, label } = granularity.bucket(record.created_at);
            let bucket = buckets.entry(start).or_insert_with(|| TrendBucket {
                period: label,
                period_start: start,
                total: 0,
                approved: 0,
                pending: 0,
                rejected: 0,
            });
            bucket.total += 1;
            match record.status {
                ClearanceStatus::Approved => bucket.approved += 1,
                ClearanceStatus::Pending => bucket.pending += 1,
                ClearanceStatus::Rejected => bucket.rejected += 1,
                ClearanceStatus::InProgress | ClearanceStatus::Completed => {}
            }
        }

        keep_recent(buckets, granularity.cap())
            .map(|(_, bucket)| bucket)
            .collect()
    }

    fn filtered<'a>(
        records: &'a [ClearanceRecord],
        filter: &'a ReportFilter,
    ) -> impl Iterator<Item = &'a ClearanceRecord> + 'a {
        records
            .iter()
            .filter(|r| filter.matches(r.created_at, r.status, r.request_type))
    }
}

/// Drops all but the `cap` newest entries, keeping chronological order.
fn keep_recent<V>(
    buckets: BTreeMap<NaiveDate, V>,
    cap: usize,
) -> impl Iterator<Item = (NaiveDate, V)> {
    let skip = buckets.len().saturating_sub(cap);
    buckets.into_iter().skip(skip)
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `part / total * 100` rounded to 2dp, zero when `total` is zero.
pub(crate) fn percentage(part: u64, total: u64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    round2(Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(total))
}

/// Arithmetic mean rounded to 2dp, zero for an empty slice.
pub(crate) fn average(values: &[i64]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let sum: Decimal = values.iter().copied().map(Decimal::from).sum();
    round2(sum / Decimal::from(values.len() as u64))
}
