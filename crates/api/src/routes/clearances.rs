//! Clearance request routes.
//!
//! Creation, listing, detail edits, soft delete/restore, bulk overrides and
//! approver decisions. Every route requires the admin capability.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    middleware::AdminUser,
    response::{error_response, success},
};
use clearance_core::clearance::{ClearanceError, ClearanceStatus, RequestType};
use clearance_db::repositories::{
    BulkActionInput, ClearanceFilter, ClearanceRepository, CreateClearanceInput,
    UpdateClearanceInput, UpdateStepInput,
};
use clearance_shared::types::PageRequest;
use clearance_shared::types::id::{ApprovalStepId, ClearanceId};

/// Creates the clearance routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/clearances",
            get(list_clearances).post(create_clearance),
        )
        .route("/admin/clearances/bulk-action", post(bulk_action))
        .route(
            "/admin/clearances/{clearance_id}",
            get(get_clearance)
                .put(update_clearance)
                .delete(delete_clearance),
        )
        .route(
            "/admin/clearances/{clearance_id}/restore",
            post(restore_clearance),
        )
        .route(
            "/admin/clearances/{clearance_id}/approvers/{approver_id}",
            put(update_approver),
        )
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for listing clearance requests.
#[derive(Debug, Default, Deserialize)]
pub struct ClearanceListQuery {
    /// Substring of the student number or name.
    pub search: Option<String>,
    /// Overall status.
    pub status: Option<String>,
    /// Request type.
    pub request_type: Option<String>,
    /// Student year level.
    pub year_level: Option<String>,
    /// Request section.
    pub section: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

impl ClearanceListQuery {
    /// Splits the query into a repository filter and a page request.
    ///
    /// Blank values are ignored; unknown status or type values are rejected.
    fn into_parts(self) -> Result<(ClearanceFilter, PageRequest), ClearanceError> {
        let status = non_blank(self.status)
            .map(|s| {
                ClearanceStatus::parse(&s)
                    .ok_or_else(|| ClearanceError::Validation(format!("unknown status '{s}'")))
            })
            .transpose()?;
        let request_type = non_blank(self.request_type)
            .map(|s| {
                RequestType::parse(&s).ok_or_else(|| {
                    ClearanceError::Validation(format!("unknown request type '{s}'"))
                })
            })
            .transpose()?;

        let filter = ClearanceFilter {
            search: non_blank(self.search),
            status,
            request_type,
            year_level: non_blank(self.year_level),
            section: non_blank(self.section),
        };
        Ok((filter, PageRequest::new(self.page, self.per_page)))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /admin/clearances
async fn list_clearances(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Query(query): Query<ClearanceListQuery>,
) -> Response {
    let (filter, page) = match query.into_parts() {
        Ok(parts) => parts,
        Err(e) => return error_response(&e, "list clearances"),
    };

    let repo = ClearanceRepository::new((*state.db).clone());
    match repo.list(&cap, &filter, &page).await {
        Ok(clearances) => success(StatusCode::OK, clearances),
        Err(e) => error_response(&e, "list clearances"),
    }
}

/// POST /admin/clearances
async fn create_clearance(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Json(input): Json<CreateClearanceInput>,
) -> Response {
    let repo = ClearanceRepository::new((*state.db).clone());

    match repo.create_clearance(&cap, input).await {
        Ok(clearance) => success(StatusCode::CREATED, clearance),
        Err(e) => error_response(&e, "create clearance"),
    }
}

/// GET /admin/clearances/{clearance_id}
async fn get_clearance(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Path(clearance_id): Path<Uuid>,
) -> Response {
    let repo = ClearanceRepository::new((*state.db).clone());

    match repo.get(&cap, ClearanceId::from_uuid(clearance_id)).await {
        Ok(clearance) => success(StatusCode::OK, clearance),
        Err(e) => error_response(&e, "get clearance"),
    }
}

/// PUT /admin/clearances/{clearance_id}
async fn update_clearance(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Path(clearance_id): Path<Uuid>,
    Json(input): Json<UpdateClearanceInput>,
) -> Response {
    let repo = ClearanceRepository::new((*state.db).clone());

    match repo
        .update_details(&cap, ClearanceId::from_uuid(clearance_id), input)
        .await
    {
        Ok(clearance) => success(StatusCode::OK, clearance),
        Err(e) => error_response(&e, "update clearance"),
    }
}

/// DELETE /admin/clearances/{clearance_id}
async fn delete_clearance(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Path(clearance_id): Path<Uuid>,
) -> Response {
    let repo = ClearanceRepository::new((*state.db).clone());

    match repo
        .soft_delete(&cap, ClearanceId::from_uuid(clearance_id))
        .await
    {
        Ok(()) => success(
            StatusCode::OK,
            json!({ "id": clearance_id, "deleted": true }),
        ),
        Err(e) => error_response(&e, "delete clearance"),
    }
}

/// POST /admin/clearances/{clearance_id}/restore
async fn restore_clearance(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Path(clearance_id): Path<Uuid>,
) -> Response {
    let repo = ClearanceRepository::new((*state.db).clone());

    match repo.restore(&cap, ClearanceId::from_uuid(clearance_id)).await {
        Ok(clearance) => success(StatusCode::OK, clearance),
        Err(e) => error_response(&e, "restore clearance"),
    }
}

/// POST /admin/clearances/bulk-action
async fn bulk_action(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Json(input): Json<BulkActionInput>,
) -> Response {
    let repo = ClearanceRepository::new((*state.db).clone());

    match repo.bulk_action(&cap, input).await {
        Ok(result) => success(StatusCode::OK, result),
        Err(e) => error_response(&e, "bulk action"),
    }
}

/// PUT /admin/clearances/{clearance_id}/approvers/{approver_id}
async fn update_approver(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Path((clearance_id, approver_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateStepInput>,
) -> Response {
    let repo = ClearanceRepository::new((*state.db).clone());

    match repo
        .update_step(
            &cap,
            ClearanceId::from_uuid(clearance_id),
            ApprovalStepId::from_uuid(approver_id),
            input,
        )
        .await
    {
        Ok(clearance) => success(StatusCode::OK, clearance),
        Err(e) => error_response(&e, "update approver"),
    }
}
