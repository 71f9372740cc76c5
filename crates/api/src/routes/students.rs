//! Student registry routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    middleware::AdminUser,
    response::{error_response, success},
};
use clearance_db::repositories::{CreateStudentInput, StudentRepository};
use clearance_shared::types::PageRequest;
use clearance_shared::types::id::StudentId;

/// Creates the student routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/students", get(list_students).post(create_student))
        .route("/admin/students/{student_id}", get(get_student))
}

/// Query parameters for listing students.
#[derive(Debug, Default, Deserialize)]
pub struct StudentListQuery {
    /// Substring of the student number or name.
    pub search: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// GET /admin/students
async fn list_students(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Query(query): Query<StudentListQuery>,
) -> Response {
    let repo = StudentRepository::new((*state.db).clone());
    let page = PageRequest::new(query.page, query.per_page);

    match repo.list(&cap, query.search.as_deref(), &page).await {
        Ok(students) => success(StatusCode::OK, students),
        Err(e) => error_response(&e, "list students"),
    }
}

/// POST /admin/students
async fn create_student(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Json(input): Json<CreateStudentInput>,
) -> Response {
    let repo = StudentRepository::new((*state.db).clone());

    match repo.create(&cap, input).await {
        Ok(student) => success(StatusCode::CREATED, student),
        Err(e) => error_response(&e, "create student"),
    }
}

/// GET /admin/students/{student_id}
async fn get_student(
    State(state): State<AppState>,
    AdminUser(cap): AdminUser,
    Path(student_id): Path<Uuid>,
) -> Response {
    let repo = StudentRepository::new((*state.db).clone());

    match repo.find(&cap, StudentId::from_uuid(student_id)).await {
        Ok(student) => success(StatusCode::OK, student),
        Err(e) => error_response(&e, "get student"),
    }
}
