//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for opening balance batches
//! - Authentication middleware
//! - Request extractors
//! - Error responses

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state};
use ledgerline_db::OpeningBalanceRepository;
use ledgerline_shared::{JwtService, OpeningBalanceConfig};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// How much error detail responses may carry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorExposure {
    /// Always attach detail.
    pub expose_details: bool,
    /// Attach detail when the caller sends `X-Debug-Errors: true`.
    pub allow_debug_header: bool,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Batch numbering and control account settings.
    pub opening_balance: Arc<OpeningBalanceConfig>,
    /// Error detail policy.
    pub errors: ErrorExposure,
}

impl AppState {
    /// Batch repository over the shared pool.
    #[must_use]
    pub fn batches(&self) -> OpeningBalanceRepository {
        OpeningBalanceRepository::new((*self.db).clone(), (*self.opening_balance).clone())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .merge(routes::health::routes())
        .layer(from_fn_with_state(
            state.clone(),
            middleware::error_detail_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
