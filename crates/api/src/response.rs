//! JSON response envelopes.
//!
//! Success: `{ "success": true, "data": ... }`.
//! Failure: `{ "success": false, "error": CODE, "message": ... }`.

use std::fmt::Display;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

use clearance_core::clearance::ClearanceError;
use clearance_core::reports::ReportError;

/// A domain error that knows its HTTP mapping.
pub trait ApiFailure: Display {
    /// HTTP status code.
    fn status_code(&self) -> u16;
    /// Stable machine-readable code.
    fn error_code(&self) -> &'static str;
}

impl ApiFailure for ClearanceError {
    fn status_code(&self) -> u16 {
        Self::status_code(self)
    }

    fn error_code(&self) -> &'static str {
        Self::error_code(self)
    }
}

impl ApiFailure for ReportError {
    fn status_code(&self) -> u16 {
        Self::status_code(self)
    }

    fn error_code(&self) -> &'static str {
        Self::error_code(self)
    }
}

/// Wraps `data` in a success envelope.
pub fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

/// Builds a failure envelope.
pub fn failure(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "error": code,
            "message": message.into()
        })),
    )
        .into_response()
}

/// Logs a domain error and converts it into a failure envelope.
///
/// Server-side failures keep their details in the log and return a
/// generic message.
pub fn error_response<E: ApiFailure>(err: &E, operation: &str) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(error = %err, operation, "Request failed");
        return failure(status, err.error_code(), "An internal error occurred");
    }

    warn!(error = %err, operation, "Request rejected");
    failure(status, err.error_code(), err.to_string())
}
