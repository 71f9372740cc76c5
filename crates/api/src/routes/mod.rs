//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod clearances;
pub mod health;
pub mod meta;
pub mod reports;
pub mod students;

/// Creates the API router: public lookups plus token-protected admin routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .merge(students::routes())
        .merge(clearances::routes())
        .merge(meta::admin_routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(meta::public_routes())
        .merge(admin_routes)
}
