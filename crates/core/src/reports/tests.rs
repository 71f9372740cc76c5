//! Tests for the reports module.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ReportError;
use super::period::Granularity;
use super::service::{ReportService, average, percentage};
use super::types::{ClearanceRecord, DateRange, ReportFilter, StepRecord, parse_granularity};
use crate::clearance::types::{ClearanceStatus, RequestType, StepStatus};

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(status: ClearanceStatus, created: DateTime<Utc>) -> ClearanceRecord {
    ClearanceRecord {
        status,
        request_type: RequestType::Graduation,
        created_at: created,
        submitted_at: Some(created),
        approved_at: None,
    }
}

fn cleared(created: DateTime<Utc>, days: i64) -> ClearanceRecord {
    ClearanceRecord {
        approved_at: Some(created + Duration::days(days)),
        ..record(ClearanceStatus::Approved, created)
    }
}

fn step(role: &str, status: StepStatus, created: DateTime<Utc>, days: Option<i64>) -> StepRecord {
    StepRecord {
        role: role.to_string(),
        status,
        created_at: created,
        approved_at: days.map(|d| created + Duration::days(d)),
        clearance_created_at: created,
        clearance_status: ClearanceStatus::InProgress,
        clearance_request_type: RequestType::Enrollment,
    }
}

// ============================================================================
// Metrics
// ============================================================================

#[test]
fn test_metrics_empty_is_zero_not_error() {
    let metrics = ReportService::get_metrics(&[], &ReportFilter::default());
    assert_eq!(metrics.total, 0);
    assert_eq!(metrics.approval_rate, Decimal::ZERO);
    assert_eq!(metrics.average_time_to_clear, Decimal::ZERO);
}

#[test]
fn test_average_excludes_missing_timestamps() {
    let missing = ClearanceRecord {
        approved_at: None,
        ..record(ClearanceStatus::Approved, at(2025, 1, 1))
    };
    let records = vec![
        cleared(at(2025, 1, 1), 2),
        cleared(at(2025, 1, 1), 4),
        missing,
        record(ClearanceStatus::Pending, at(2025, 1, 2)),
    ];

    let metrics = ReportService::get_metrics(&records, &ReportFilter::default());

    assert_eq!(metrics.total, 4);
    assert_eq!(metrics.approved, 3);
    assert_eq!(metrics.pending, 1);
    assert_eq!(metrics.average_time_to_clear, dec!(3));
    assert_eq!(metrics.approval_rate, dec!(75.00));
}

#[test]
fn test_days_to_clear_uses_calendar_dates() {
    let submitted = Utc.with_ymd_and_hms(2025, 1, 1, 23, 59, 0).unwrap();
    let approved = Utc.with_ymd_and_hms(2025, 1, 2, 0, 1, 0).unwrap();
    let r = ClearanceRecord {
        submitted_at: Some(submitted),
        approved_at: Some(approved),
        ..record(ClearanceStatus::Approved, submitted)
    };
    assert_eq!(r.days_to_clear(), Some(1));
}

#[test]
fn test_completed_requests_do_not_count_towards_time_to_clear() {
    let completed = ClearanceRecord {
        status: ClearanceStatus::Completed,
        ..cleared(at(2025, 2, 1), 10)
    };
    let metrics = ReportService::get_metrics(&[completed], &ReportFilter::default());
    assert_eq!(metrics.completed, 1);
    assert_eq!(metrics.average_time_to_clear, Decimal::ZERO);
}

#[test]
fn test_percentage_and_average_rounding() {
    assert_eq!(percentage(0, 0), Decimal::ZERO);
    assert_eq!(percentage(1, 3), dec!(33.33));
    assert_eq!(percentage(2, 3), dec!(66.67));
    assert_eq!(percentage(1, 8), dec!(12.50));
    assert_eq!(average(&[]), Decimal::ZERO);
    assert_eq!(average(&[1, 2]), dec!(1.5));
    assert_eq!(average(&[1, 1, 2]), dec!(1.33));
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_filter_date_range_is_inclusive() {
    let records = vec![
        record(ClearanceStatus::Pending, at(2025, 3, 1)),
        record(ClearanceStatus::Pending, at(2025, 3, 15)),
        record(ClearanceStatus::Pending, at(2025, 3, 31)),
        record(ClearanceStatus::Pending, at(2025, 4, 1)),
    ];
    let filter = ReportFilter {
        range: DateRange::new(Some(day(2025, 3, 1)), Some(day(2025, 3, 31))).unwrap(),
        ..ReportFilter::default()
    };

    assert_eq!(ReportService::get_metrics(&records, &filter).total, 3);
}

#[test]
fn test_filter_status_and_type() {
    let mut transfer = record(ClearanceStatus::Rejected, at(2025, 3, 1));
    transfer.request_type = RequestType::Transfer;
    let records = vec![
        transfer,
        record(ClearanceStatus::Rejected, at(2025, 3, 2)),
        record(ClearanceStatus::Pending, at(2025, 3, 3)),
    ];

    let filter =
        ReportFilter::from_query(None, None, Some("rejected"), Some("graduation")).unwrap();
    let metrics = ReportService::get_metrics(&records, &filter);
    assert_eq!(metrics.total, 1);
    assert_eq!(metrics.rejected, 1);
}

#[test]
fn test_reversed_range_is_rejected() {
    let result = DateRange::new(Some(day(2025, 5, 1)), Some(day(2025, 4, 1)));
    assert!(matches!(result, Err(ReportError::InvalidDateRange { .. })));
}

#[test]
fn test_unknown_filter_values_are_rejected() {
    assert!(matches!(
        ReportFilter::from_query(None, None, Some("archived"), None),
        Err(ReportError::InvalidFilter(_))
    ));
    assert!(matches!(
        ReportFilter::from_query(None, None, None, Some("scholarship")),
        Err(ReportError::InvalidFilter(_))
    ));
    assert!(ReportFilter::from_query(None, None, Some(""), Some(" ")).is_ok());
}

#[test]
fn test_parse_granularity() {
    assert_eq!(parse_granularity(None).unwrap(), Granularity::Month);
    assert_eq!(parse_granularity(Some("week")).unwrap(), Granularity::Week);
    assert!(parse_granularity(Some("decade")).is_err());
}

// ============================================================================
// Time to clear
// ============================================================================

#[test]
fn test_time_to_clear_buckets_by_approval_month() {
    let records = vec![
        cleared(at(2025, 1, 10), 3),
        cleared(at(2025, 1, 20), 5),
        cleared(at(2025, 1, 28), 6), // approved 2025-02-03
        record(ClearanceStatus::Pending, at(2025, 1, 5)),
    ];

    let buckets = ReportService::get_time_to_clear_statistics(
        &records,
        &ReportFilter::default(),
        Granularity::Month,
    );

    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].period, "2025-01");
    assert_eq!(buckets[0].total_cleared, 2);
    assert_eq!(buckets[0].average_days, dec!(4));
    assert_eq!(buckets[0].minimum_days, 3);
    assert_eq!(buckets[0].maximum_days, 5);
    assert_eq!(buckets[1].period, "2025-02");
    assert_eq!(buckets[1].period_start, day(2025, 2, 1));
    assert_eq!(buckets[1].total_cleared, 1);
}

// ============================================================================
// Trends
// ============================================================================

#[test]
fn test_quarterly_trends_keep_latest_eight() {
    // 2023-Q1 through 2025-Q2
    let records: Vec<_> = (0..10u32)
        .map(|q| {
            let year = 2023 + i32::try_from(q / 4).unwrap();
            let month = (q % 4) * 3 + 2;
            record(ClearanceStatus::Pending, at(year, month, 15))
        })
        .collect();

    let trends =
        ReportService::get_trends(&records, &ReportFilter::default(), Granularity::Quarter);

    let labels: Vec<_> = trends.iter().map(|t| t.period.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "2023-Q3", "2023-Q4", "2024-Q1", "2024-Q2", "2024-Q3", "2024-Q4", "2025-Q1",
            "2025-Q2",
        ]
    );
}

#[test]
fn test_monthly_trends_keep_latest_twelve() {
    let records: Vec<_> = (0..14u32)
        .map(|m| {
            let year = 2024 + i32::try_from(m / 12).unwrap();
            record(ClearanceStatus::Approved, at(year, m % 12 + 1, 1))
        })
        .collect();

    let trends = ReportService::get_trends(&records, &ReportFilter::default(), Granularity::Month);

    assert_eq!(trends.len(), 12);
    assert_eq!(trends[0].period, "2024-03");
    assert_eq!(trends[11].period, "2025-02");
}

#[test]
fn test_trend_counts() {
    let records = vec![
        record(ClearanceStatus::Approved, at(2025, 5, 1)),
        record(ClearanceStatus::Pending, at(2025, 5, 2)),
        record(ClearanceStatus::Rejected, at(2025, 5, 3)),
        record(ClearanceStatus::InProgress, at(2025, 5, 4)),
    ];

    let trends = ReportService::get_trends(&records, &ReportFilter::default(), Granularity::Year);

    assert_eq!(trends.len(), 1);
    let bucket = &trends[0];
    assert_eq!(bucket.period, "2025");
    assert_eq!(bucket.total, 4);
    assert_eq!(bucket.approved, 1);
    assert_eq!(bucket.pending, 1);
    assert_eq!(bucket.rejected, 1);
}

// ============================================================================
// Detailed statistics
// ============================================================================

#[test]
fn test_detailed_statistics() {
    let mut enrollment = record(ClearanceStatus::Approved, at(2025, 1, 5));
    enrollment.request_type = RequestType::Enrollment;
    let records = vec![
        enrollment,
        record(ClearanceStatus::Approved, at(2025, 1, 6)),
        record(ClearanceStatus::Pending, at(2025, 2, 6)),
        record(ClearanceStatus::Rejected, at(2025, 2, 7)),
    ];

    let stats = ReportService::get_detailed_statistics(&records, &ReportFilter::default());

    assert_eq!(stats.by_type.len(), 2);
    assert_eq!(stats.by_type[0].request_type, RequestType::Enrollment);
    assert_eq!(stats.by_type[0].total, 1);
    let graduation = &stats.by_type[1];
    assert_eq!(graduation.label, "Graduation");
    assert_eq!(graduation.total, 3);
    assert_eq!(graduation.approved, 1);
    assert_eq!(graduation.pending, 1);
    assert_eq!(graduation.rejected, 1);

    let statuses: Vec<_> = stats.by_status.iter().map(|s| (s.status, s.count)).collect();
    assert_eq!(
        statuses,
        vec![
            (ClearanceStatus::Pending, 1),
            (ClearanceStatus::Approved, 2),
            (ClearanceStatus::Rejected, 1),
        ]
    );

    assert_eq!(stats.monthly_trends.len(), 2);
    assert_eq!(stats.monthly_trends[0].month, "2025-01");
    assert_eq!(stats.monthly_trends[0].approved, 2);
    assert_eq!(stats.monthly_trends[1].total, 2);
}

// ============================================================================
// Organization performance
// ============================================================================

#[test]
fn test_organization_performance() {
    let created = at(2025, 6, 1);
    let steps = vec![
        step("dean", StepStatus::Approved, created, Some(2)),
        step("dean", StepStatus::Approved, created, Some(5)),
        step("dean", StepStatus::Rejected, created, None),
        step("librarian", StepStatus::Pending, created, None),
    ];

    let perf = ReportService::get_organization_performance(&steps, &ReportFilter::default());

    assert_eq!(perf.len(), 2);
    let dean = &perf[0];
    assert_eq!(dean.organization, "dean");
    assert_eq!(dean.total_processed, 3);
    assert_eq!(dean.cleared, 2);
    assert_eq!(dean.not_cleared, 1);
    assert_eq!(dean.clearance_rate, dec!(66.67));
    assert_eq!(dean.avg_processing_days, dec!(3.5));

    let librarian = &perf[1];
    assert_eq!(librarian.pending, 1);
    assert_eq!(librarian.clearance_rate, Decimal::ZERO);
    assert_eq!(librarian.avg_processing_days, Decimal::ZERO);
}

#[test]
fn test_organization_performance_filters_on_parent() {
    let mut other = step("dean", StepStatus::Approved, at(2025, 6, 1), Some(1));
    other.clearance_request_type = RequestType::Transfer;
    let steps = vec![other, step("dean", StepStatus::Pending, at(2025, 6, 1), None)];

    let filter = ReportFilter::from_query(None, None, None, Some("enrollment")).unwrap();
    let perf = ReportService::get_organization_performance(&steps, &filter);

    assert_eq!(perf.len(), 1);
    assert_eq!(perf[0].total_processed, 1);
    assert_eq!(perf[0].pending, 1);
}

// ============================================================================
// Properties
// ============================================================================

fn arb_status() -> impl Strategy<Value = ClearanceStatus> {
    prop::sample::select(ClearanceStatus::ALL.to_vec())
}

fn arb_record() -> impl Strategy<Value = ClearanceRecord> {
    (
        arb_status(),
        prop::sample::select(RequestType::ALL.to_vec()),
        0i64..1500,
        prop::option::of(0i64..60),
    )
        .prop_map(|(status, request_type, offset, days)| {
            let created = at(2022, 1, 1) + Duration::days(offset);
            ClearanceRecord {
                status,
                request_type,
                created_at: created,
                submitted_at: Some(created),
                approved_at: days.map(|d| created + Duration::days(d)),
            }
        })
}

fn arb_granularity() -> impl Strategy<Value = Granularity> {
    prop_oneof![
        Just(Granularity::Day),
        Just(Granularity::Week),
        Just(Granularity::Month),
        Just(Granularity::Quarter),
        Just(Granularity::Year),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Reports are identical for any permutation of the input rows.
    #[test]
    fn prop_reports_are_order_independent(
        (records, shuffled) in prop::collection::vec(arb_record(), 0..40)
            .prop_flat_map(|r| (Just(r.clone()), Just(r).prop_shuffle())),
        granularity in arb_granularity(),
    ) {
        let filter = ReportFilter::default();
        prop_assert_eq!(
            ReportService::get_metrics(&records, &filter),
            ReportService::get_metrics(&shuffled, &filter)
        );
        prop_assert_eq!(
            ReportService::get_trends(&records, &filter, granularity),
            ReportService::get_trends(&shuffled, &filter, granularity)
        );
        prop_assert_eq!(
            ReportService::get_time_to_clear_statistics(&records, &filter, granularity),
            ReportService::get_time_to_clear_statistics(&shuffled, &filter, granularity)
        );
        prop_assert_eq!(
            ReportService::get_detailed_statistics(&records, &filter),
            ReportService::get_detailed_statistics(&shuffled, &filter)
        );
    }

    /// Trend output never exceeds the cap and is strictly chronological.
    #[test]
    fn prop_trends_are_capped_and_ordered(
        records in prop::collection::vec(arb_record(), 0..80),
        granularity in arb_granularity(),
    ) {
        let trends = ReportService::get_trends(&records, &ReportFilter::default(), granularity);
        prop_assert!(trends.len() <= granularity.cap());
        prop_assert!(trends.windows(2).all(|w| w[0].period_start < w[1].period_start));
    }

    /// Status counts always add up to the total.
    #[test]
    fn prop_metric_counts_partition_total(records in prop::collection::vec(arb_record(), 0..40)) {
        let m = ReportService::get_metrics(&records, &ReportFilter::default());
        prop_assert_eq!(
            m.approved + m.pending + m.in_progress + m.rejected + m.completed,
            m.total
        );
        prop_assert!(m.approval_rate >= Decimal::ZERO && m.approval_rate <= dec!(100));
    }
}
