//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{
    AppState,
    response::{error_response, failure},
};
use clearance_core::clearance::{AdminCapability, Caller, CallerRole};
use clearance_shared::types::id::UserId;
use clearance_shared::{Claims, JwtError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Validates the bearer token and stores its claims in request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return failure(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Authorization header with Bearer token is required",
        );
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => {
            failure(StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED", "Token has expired")
        }
        Err(_) => failure(
            StatusCode::UNAUTHORIZED,
            "INVALID_TOKEN",
            "Invalid or malformed token",
        ),
    }
}

/// Builds a caller from validated claims. `None` for an unknown role.
#[must_use]
pub fn caller_from_claims(claims: &Claims) -> Option<Caller> {
    CallerRole::parse(&claims.role)
        .map(|role| Caller::new(UserId::from_uuid(claims.user_id()), role))
}

/// Extractor that only succeeds for administrators.
///
/// ```ignore
/// async fn handler(AdminUser(cap): AdminUser) -> impl IntoResponse {
///     repo.bulk_action(&cap, input).await
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AdminCapability);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(claims) = parts.extensions.get::<Claims>() else {
            return Err(failure(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required",
            ));
        };

        let Some(caller) = caller_from_claims(claims) else {
            return Err(failure(
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                format!("unknown role '{}'", claims.role),
            ));
        };

        caller
            .authorize_admin()
            .map(AdminUser)
            .map_err(|e| error_response(&e, "authorize admin"))
    }
}
