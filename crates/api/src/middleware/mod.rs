//! Request middleware and extractors.

pub mod auth;

pub use auth::{AdminUser, auth_middleware, caller_from_claims};
