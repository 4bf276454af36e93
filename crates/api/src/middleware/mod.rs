//! Request middleware.

pub mod auth;
pub mod error_detail;

pub use auth::{AuthUser, auth_middleware};
pub use error_detail::{DEBUG_ERRORS_HEADER, error_detail_middleware};
