//! Router tests that stop before the database.
//!
//! The state carries a disconnected handle, so these cover routing, the
//! token guard, the admin check and query validation.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use clearance_api::{AppState, create_router};
use clearance_shared::{JwtConfig, JwtService};

const SECRET: &str = "router-test-secret";

fn jwt(expires_minutes: i64) -> JwtService {
    JwtService::new(JwtConfig {
        secret: SECRET.to_string(),
        access_token_expires_minutes: expires_minutes,
    })
}

fn app() -> Router {
    create_router(AppState {
        db: Arc::new(DatabaseConnection::Disconnected),
        jwt_service: Arc::new(jwt(15)),
    })
}

fn token(role: &str) -> String {
    jwt(15).generate_access_token(Uuid::new_v4(), role).unwrap()
}

async fn send(uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let response = app()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_reports_degraded_without_database() {
    let (status, body) = send("/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], false);
}

#[tokio::test]
async fn test_public_lookups_need_no_token() {
    let (status, body) = send("/api/v1/public/clearances/request-types", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(7));

    let (status, body) = send("/api/v1/public/clearances/approver-roles", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["value"], "organization_treasurer");
}

#[tokio::test]
async fn test_admin_route_without_token_is_unauthorized() {
    let (status, body) = send("/api/v1/admin/clearances", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_malformed_token_is_rejected() {
    let (status, body) = send("/api/v1/admin/clearances", Some("not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let expired = jwt(-10)
        .generate_access_token(Uuid::new_v4(), "admin")
        .unwrap();
    let (status, body) = send("/api/v1/admin/reports/metrics", Some(&expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_non_admin_roles_are_forbidden() {
    for role in ["staff", "student", "registrar"] {
        let (status, body) = send("/api/v1/admin/reports/metrics", Some(&token(role))).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "role {role}");
        assert_eq!(body["error"], "FORBIDDEN");
    }
}

#[tokio::test]
async fn test_admin_meta_lookups() {
    let (status, body) = send(
        "/api/v1/admin/clearances/meta/approver-roles",
        Some(&token("admin")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(10));
}

#[tokio::test]
async fn test_reversed_report_range_is_rejected_before_loading() {
    let (status, body) = send(
        "/api/v1/admin/reports/trends?from=2025-06-01&to=2025-01-01",
        Some(&token("admin")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_DATE_RANGE");
}

#[tokio::test]
async fn test_unknown_group_by_is_rejected() {
    let (status, body) = send(
        "/api/v1/admin/reports/time-to-clear?group_by=decade",
        Some(&token("admin")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_list_status_is_rejected() {
    let (status, body) = send(
        "/api/v1/admin/clearances?status=archived",
        Some(&token("admin")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_database_failure_hides_details() {
    let (status, body) = send("/api/v1/admin/reports/metrics", Some(&token("admin"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "DATABASE_ERROR");
    assert_eq!(body["message"], "An internal error occurred");
}
