//! Opt-in error detail.
//!
//! Detail is added to error bodies when the server exposes it by default, or
//! when the caller sends `X-Debug-Errors: true` and debug headers are allowed.

use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, error::ErrorDetail};

/// Request header asking for error detail.
pub const DEBUG_ERRORS_HEADER: &str = "x-debug-errors";

fn debug_requested(request: &Request) -> bool {
    request
        .headers()
        .get(DEBUG_ERRORS_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Rewrites error responses to include their detail when allowed.
pub async fn error_detail_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let verbose = state.errors.expose_details
        || (state.errors.allow_debug_header && debug_requested(&request));

    let mut response = next.run(request).await;
    if !verbose {
        return response;
    }
    let Some(detail) = response.extensions_mut().remove::<ErrorDetail>() else {
        return response;
    };

    (
        response.status(),
        Json(json!({
            "error": detail.code,
            "message": detail.message,
            "detail": detail.detail,
        })),
    )
        .into_response()
}
