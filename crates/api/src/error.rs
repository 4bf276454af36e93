//! API error responses.
//!
//! Every failure is rendered as `{"error": CODE, "message": text}`. The
//! underlying detail travels in a response extension and is only written
//! into the body by [`crate::middleware::error_detail_middleware`] when the
//! server allows it.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ledgerline_core::opening_balance::OpeningBalanceError;
use ledgerline_shared::AppError;
use serde_json::json;
use tracing::{error, warn};

/// Message shown in place of internal error text.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error detail withheld from the default response body.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    /// Wire error code.
    pub code: &'static str,
    /// Public message.
    pub message: String,
    /// Internal detail.
    pub detail: String,
}

/// Errors returned by handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Opening balance domain failure.
    Batch(OpeningBalanceError),
    /// Application-level failure.
    App(AppError),
}

impl ApiError {
    /// A `VALIDATION_ERROR` with the given message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::App(AppError::Validation(message.into()))
    }

    /// A `UNAUTHORIZED` error with the given message.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::App(AppError::Unauthorized(message.into()))
    }

    fn status_code(&self) -> u16 {
        match self {
            Self::Batch(e) => e.status_code(),
            Self::App(e) => e.status_code(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Batch(e) => e.error_code(),
            Self::App(e) => e.error_code(),
        }
    }

    fn is_internal(&self) -> bool {
        match self {
            Self::Batch(e) => e.is_internal(),
            Self::App(_) => false,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Batch(e) => format!("{e:?}"),
            Self::App(e) => format!("{e:?}"),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Batch(e) => e.fmt(f),
            Self::App(e) => e.fmt(f),
        }
    }
}

impl From<OpeningBalanceError> for ApiError {
    fn from(err: OpeningBalanceError) -> Self {
        Self::Batch(err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = self.error_code();
        let detail = self.detail();

        let message = if self.is_internal() {
            error!(code, error = %self, "Request failed");
            INTERNAL_MESSAGE.to_string()
        } else {
            warn!(code, error = %self, "Request rejected");
            self.to_string()
        };

        let mut response = (
            status,
            Json(json!({
                "error": code,
                "message": message,
            })),
        )
            .into_response();
        response.extensions_mut().insert(ErrorDetail {
            code,
            message,
            detail,
        });
        response
    }
}
