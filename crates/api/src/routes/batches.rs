//! Opening balance batch routes.
//!
//! The acting user and company always come from the bearer token.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use ledgerline_core::opening_balance::{BatchInput, BatchStatus, EditDecision};
use ledgerline_db::repositories::BatchFilter;
use ledgerline_shared::types::PageRequest;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    error::ApiError,
    extractors::{OptionalJson, ValidJson, ValidQuery},
    middleware::AuthUser,
};

/// Creates the batch routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/batches", get(list_batches).post(create_batch))
        .route("/batches/{batch_id}", get(get_batch).put(update_batch))
        .route("/batches/{batch_id}/submit", post(submit_batch))
        .route("/batches/{batch_id}/approve", post(approve_batch))
        .route("/batches/{batch_id}/reject", post(reject_batch))
        .route("/batches/{batch_id}/cancel", post(cancel_batch))
        .route("/batches/{batch_id}/request-edit", post(request_edit))
        .route(
            "/batches/{batch_id}/decide-edit-request",
            post(decide_edit_request),
        )
        .route("/batches/{batch_id}/history", get(batch_history))
        .route("/batches/{batch_id}/journal-entries", get(journal_entries))
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for listing batches.
#[derive(Debug, Deserialize)]
pub struct ListBatchesQuery {
    /// Filter by status (`draft`, `submitted`, `approved`, `rejected`).
    pub status: Option<BatchStatus>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Query parameters for journal entries.
#[derive(Debug, Deserialize)]
pub struct JournalEntriesQuery {
    /// Also return journals replaced by a later approval.
    #[serde(default)]
    pub include_superseded: bool,
}

/// Request body for approving a batch.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApproveRequest {
    /// Optional approver comment.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Request body carrying a reason.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReasonRequest {
    /// Reason text. Blank counts as missing.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Request body for deciding an edit request.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecideEditRequestBody {
    /// `approve` or `reject`.
    pub decision: EditDecision,
    /// Required when rejecting.
    #[serde(default)]
    pub reason: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/batches` - List batches, newest first.
async fn list_batches(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(query): ValidQuery<ListBatchesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = BatchFilter {
        status: query.status,
    };

    let batches = state.batches().list(auth.company_id(), filter, page).await?;
    Ok(Json(batches))
}

/// POST `/batches` - Create a draft batch.
async fn create_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(input): ValidJson<BatchInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .batches()
        .create(auth.company_id(), auth.user_id(), &input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": created.id,
            "batch_number": created.batch_number,
            "message": "Opening balance batch created",
        })),
    ))
}

/// GET `/batches/{batch_id}` - Batch header with lines.
async fn get_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(batch_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.batches().get(auth.company_id(), batch_id).await?;
    Ok(Json(detail))
}

/// PUT `/batches/{batch_id}` - Replace header and lines.
async fn update_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(batch_id): Path<i32>,
    ValidJson(input): ValidJson<BatchInput>,
) -> Result<impl IntoResponse, ApiError> {
    let batch = state
        .batches()
        .update(auth.company_id(), batch_id, auth.user_id(), &input)
        .await?;
    Ok(Json(json!({
        "message": "Opening balance batch updated",
        "batch": batch,
    })))
}

/// POST `/batches/{batch_id}/submit` - Send a draft for approval.
async fn submit_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(batch_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let batch = state
        .batches()
        .submit(auth.company_id(), batch_id, auth.user_id())
        .await?;
    Ok(Json(json!({
        "message": "Opening balance batch submitted",
        "batch": batch,
    })))
}

/// POST `/batches/{batch_id}/approve` - Approve and post the journal.
async fn approve_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(batch_id): Path<i32>,
    OptionalJson(body): OptionalJson<ApproveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let approved = state
        .batches()
        .approve(
            auth.company_id(),
            batch_id,
            auth.user_id(),
            body.comment.as_deref(),
        )
        .await?;
    Ok(Json(json!({
        "message": "Opening balance batch approved",
        "journal_id": approved.journal_id,
        "superseded_journal_id": approved.superseded_journal_id,
    })))
}

/// POST `/batches/{batch_id}/reject` - Return a submitted batch.
async fn reject_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(batch_id): Path<i32>,
    OptionalJson(body): OptionalJson<ReasonRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let batch = state
        .batches()
        .reject(
            auth.company_id(),
            batch_id,
            auth.user_id(),
            body.reason.as_deref(),
        )
        .await?;
    Ok(Json(json!({
        "message": "Opening balance batch rejected",
        "batch": batch,
    })))
}

/// POST `/batches/{batch_id}/cancel` - Delete a draft.
async fn cancel_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(batch_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .batches()
        .cancel(auth.company_id(), batch_id, auth.user_id())
        .await?;
    Ok(Json(json!({ "message": "Opening balance batch cancelled" })))
}

/// POST `/batches/{batch_id}/request-edit` - Ask to reopen an approved batch.
async fn request_edit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(batch_id): Path<i32>,
    OptionalJson(body): OptionalJson<ReasonRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let batch = state
        .batches()
        .request_edit(
            auth.company_id(),
            batch_id,
            auth.user_id(),
            body.reason.as_deref(),
        )
        .await?;
    Ok(Json(json!({
        "message": "Edit request submitted",
        "batch": batch,
    })))
}

/// POST `/batches/{batch_id}/decide-edit-request` - Grant or refuse an edit.
async fn decide_edit_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(batch_id): Path<i32>,
    ValidJson(body): ValidJson<DecideEditRequestBody>,
) -> Result<impl IntoResponse, ApiError> {
    let batch = state
        .batches()
        .decide_edit_request(
            auth.company_id(),
            batch_id,
            auth.user_id(),
            body.decision,
            body.reason.as_deref(),
        )
        .await?;
    let message = match body.decision {
        EditDecision::Approve => "Edit request approved",
        EditDecision::Reject => "Edit request rejected",
    };
    Ok(Json(json!({
        "message": message,
        "batch": batch,
    })))
}

/// GET `/batches/{batch_id}/history` - History entries, oldest first.
async fn batch_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(batch_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state.batches().history(auth.company_id(), batch_id).await?;
    Ok(Json(json!({ "data": entries })))
}

/// GET `/batches/{batch_id}/journal-entries` - Journals posted for the batch.
async fn journal_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(batch_id): Path<i32>,
    ValidQuery(query): ValidQuery<JournalEntriesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let journals = state
        .batches()
        .journal_entries(auth.company_id(), batch_id, query.include_superseded)
        .await?;
    Ok(Json(json!({ "data": journals })))
}
