//! Lookup tables: request types and approver roles.

use axum::{Router, http::StatusCode, response::Response, routing::get};
use serde::Serialize;

use crate::{AppState, middleware::AdminUser, response::success};
use clearance_core::clearance::{ApproverRole, RequestType};

/// One selectable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupOption {
    /// Wire value.
    pub value: &'static str,
    /// Display label.
    pub label: &'static str,
}

fn request_type_options() -> Vec<LookupOption> {
    RequestType::ALL
        .iter()
        .map(|t| LookupOption {
            value: t.as_str(),
            label: t.label(),
        })
        .collect()
}

fn approver_role_options() -> Vec<LookupOption> {
    ApproverRole::ALL
        .iter()
        .map(|r| LookupOption {
            value: r.as_str(),
            label: r.label(),
        })
        .collect()
}

async fn list_request_types() -> Response {
    success(StatusCode::OK, request_type_options())
}

async fn list_approver_roles() -> Response {
    success(StatusCode::OK, approver_role_options())
}

async fn admin_request_types(_admin: AdminUser) -> Response {
    success(StatusCode::OK, request_type_options())
}

async fn admin_approver_roles(_admin: AdminUser) -> Response {
    success(StatusCode::OK, approver_role_options())
}

/// Lookups that need no token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/public/clearances/request-types", get(list_request_types))
        .route("/public/clearances/approver-roles", get(list_approver_roles))
}

/// The same lookups behind the admin guard.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/clearances/meta/request-types",
            get(admin_request_types),
        )
        .route(
            "/admin/clearances/meta/approver-roles",
            get(admin_approver_roles),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_type_options_cover_vocabulary() {
        let options = request_type_options();
        assert_eq!(options.len(), 7);
        assert_eq!(
            options[6],
            LookupOption {
                value: "leave_of_absence",
                label: "Leave of Absence"
            }
        );
    }

    #[test]
    fn test_approver_role_options_in_display_order() {
        let options = approver_role_options();
        assert_eq!(options.len(), 10);
        assert_eq!(options[0].value, "organization_treasurer");
        assert_eq!(options[7].label, "VPSD (Vice President for Student Development)");
    }
}
