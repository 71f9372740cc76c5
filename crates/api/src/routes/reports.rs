//! Report routes.

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    middleware::AdminUser,
    response::{error_response, success},
};
use clearance_core::reports::{Granularity, ReportError, ReportFilter, parse_granularity};
use clearance_db::ReportRepository;

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/reports/metrics", get(get_metrics))
        .route("/admin/reports/time-to-clear", get(get_time_to_clear))
        .route("/admin/reports/detailed", get(get_detailed))
        .route("/admin/reports/organizations", get(get_organizations))
        .route("/admin/reports/trends", get(get_trends))
}

/// Query parameters shared by all reports.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// First creation date included.
    pub from: Option<NaiveDate>,
    /// Last creation date included.
    pub to: Option<NaiveDate>,
    /// Overall status.
    pub status: Option<String>,
    /// Request type.
    pub request_type: Option<String>,
    /// Period size for time-based reports.
    pub group_by: Option<String>,
}

impl ReportQuery {
    fn filter(&self) -> Result<ReportFilter, ReportError> {
        ReportFilter::from_query(
            self.from,
            self.to,
            self.status.as_deref(),
            self.request_type.as_deref(),
        )
    }

    fn filter_and_granularity(&self) -> Result<(ReportFilter, Granularity), ReportError> {
        Ok((self.filter()?, parse_granularity(self.group_by.as_deref())?))
    }
}

/// GET /admin/reports/metrics
async fn get_metrics(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Query(query): Query<ReportQuery>,
) -> Response {
    let filter = match query.filter() {
        Ok(f) => f,
        Err(e) => return error_response(&e, "report metrics"),
    };

    let repo = ReportRepository::new((*state.db).clone());
    match repo.get_metrics(&cap, &filter).await {
        Ok(metrics) => success(StatusCode::OK, metrics),
        Err(e) => error_response(&e, "report metrics"),
    }
}

/// GET /admin/reports/time-to-clear
async fn get_time_to_clear(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Query(query): Query<ReportQuery>,
) -> Response {
    let (filter, granularity) = match query.filter_and_granularity() {
        Ok(parts) => parts,
        Err(e) => return error_response(&e, "time to clear report"),
    };

    let repo = ReportRepository::new((*state.db).clone());
    match repo
        .get_time_to_clear_statistics(&cap, &filter, granularity)
        .await
    {
        Ok(buckets) => success(
            StatusCode::OK,
            json!({ "group_by": granularity.as_str(), "buckets": buckets }),
        ),
        Err(e) => error_response(&e, "time to clear report"),
    }
}

/// GET /admin/reports/detailed
async fn get_detailed(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Query(query): Query<ReportQuery>,
) -> Response {
    let filter = match query.filter() {
        Ok(f) => f,
        Err(e) => return error_response(&e, "detailed report"),
    };

    let repo = ReportRepository::new((*state.db).clone());
    match repo.get_detailed_statistics(&cap, &filter).await {
        Ok(statistics) => success(StatusCode::OK, statistics),
        Err(e) => error_response(&e, "detailed report"),
    }
}

/// GET /admin/reports/organizations
async fn get_organizations(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Query(query): Query<ReportQuery>,
) -> Response {
    let filter = match query.filter() {
        Ok(f) => f,
        Err(e) => return error_response(&e, "organization report"),
    };

    let repo = ReportRepository::new((*state.db).clone());
    match repo.get_organization_performance(&cap, &filter).await {
        Ok(rows) => success(StatusCode::OK, rows),
        Err(e) => error_response(&e, "organization report"),
    }
}

/// GET /admin/reports/trends
async fn get_trends(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Query(query): Query<ReportQuery>,
) -> Response {
    let (filter, granularity) = match query.filter_and_granularity() {
        Ok(parts) => parts,
        Err(e) => return error_response(&e, "trends report"),
    };

    let repo = ReportRepository::new((*state.db).clone());
    match repo.get_trends(&cap, &filter, granularity).await {
        Ok(buckets) => success(
            StatusCode::OK,
            json!({ "group_by": granularity.as_str(), "buckets": buckets }),
        ),
        Err(e) => error_response(&e, "trends report"),
    }
}
