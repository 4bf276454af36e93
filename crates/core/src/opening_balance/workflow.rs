//! Batch workflow state machine.
//!
//! ```text
//! Draft ──submit──▶ Submitted ──approve──▶ Approved
//!   ▲                  │                      │
//!   │                reject            request edit (Pending)
//!   │                  ▼                      │
//!   └──── update ── Rejected      decide: approve ──▶ Draft
//!                                 decide: reject  ──▶ stays Approved
//! ```
//!
//! `update` is allowed from Draft, Submitted and Rejected and always lands
//! in Draft. `cancel` removes a Draft batch that has never been posted; a
//! batch reopened by an edit request keeps its journal until it is approved
//! again.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::audit::HistoryAction;

use super::error::OpeningBalanceError;
use super::types::{BatchStatus, EditDecision, EditRequestStatus};

/// The persisted state a transition is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchState {
    /// Batch id, for error reporting.
    pub batch_id: i32,
    /// Lifecycle status.
    pub status: BatchStatus,
    /// Edit-request sub-status.
    pub edit_request_status: EditRequestStatus,
    /// A journal has been posted for the batch.
    pub has_journal: bool,
}

/// A validated transition and the audit fields it sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchTransition {
    /// Header and lines replaced.
    Update {
        /// Always Draft.
        new_status: BatchStatus,
    },
    /// Sent for approval.
    Submit {
        /// Always Submitted.
        new_status: BatchStatus,
        /// Submitting user.
        submitted_by: Uuid,
        /// Submission time.
        submitted_at: DateTime<Utc>,
    },
    /// Approved and posted.
    Approve {
        /// Always Approved.
        new_status: BatchStatus,
        /// Approving user.
        approved_by: Uuid,
        /// Approval time.
        approved_at: DateTime<Utc>,
        /// Optional approver comment.
        comment: Option<String>,
        /// Edit-request status after approval.
        edit_request_status: EditRequestStatus,
    },
    /// Returned by an approver.
    Reject {
        /// Always Rejected.
        new_status: BatchStatus,
        /// Rejecting user.
        rejected_by: Uuid,
        /// Rejection time.
        rejected_at: DateTime<Utc>,
        /// Rejection reason.
        reason: String,
    },
    /// Draft removed.
    Cancel,
    /// Edit of an approved batch requested.
    RequestEdit {
        /// Always Pending.
        edit_request_status: EditRequestStatus,
        /// Requesting user.
        requested_by: Uuid,
        /// Request time.
        requested_at: DateTime<Utc>,
        /// Why the edit is needed.
        reason: String,
    },
    /// Edit request granted; batch reopened.
    ApproveEdit {
        /// Always Draft.
        new_status: BatchStatus,
        /// Always Approved.
        edit_request_status: EditRequestStatus,
        /// Reviewing user.
        reviewed_by: Uuid,
        /// Review time.
        reviewed_at: DateTime<Utc>,
    },
    /// Edit request refused.
    RejectEdit {
        /// Always Rejected.
        edit_request_status: EditRequestStatus,
        /// Reviewing user.
        reviewed_by: Uuid,
        /// Review time.
        reviewed_at: DateTime<Utc>,
        /// Refusal reason.
        reason: String,
    },
}

impl BatchTransition {
    /// Status after the transition, if it changes.
    #[must_use]
    pub const fn new_status(&self) -> Option<BatchStatus> {
        match self {
            Self::Update { new_status }
            | Self::Submit { new_status, .. }
            | Self::Approve { new_status, .. }
            | Self::Reject { new_status, .. }
            | Self::ApproveEdit { new_status, .. } => Some(*new_status),
            Self::Cancel | Self::RequestEdit { .. } | Self::RejectEdit { .. } => None,
        }
    }

    /// History action recorded for the transition.
    #[must_use]
    pub const fn history_action(&self) -> HistoryAction {
        match self {
            Self::Update { .. } => HistoryAction::Updated,
            Self::Submit { .. } => HistoryAction::Submitted,
            Self::Approve { .. } => HistoryAction::Approved,
            Self::Reject { .. } => HistoryAction::Rejected,
            Self::Cancel => HistoryAction::Cancelled,
            Self::RequestEdit { .. } => HistoryAction::EditRequested,
            Self::ApproveEdit { .. } => HistoryAction::EditRequestApproved,
            Self::RejectEdit { .. } => HistoryAction::EditRequestRejected,
        }
    }
}

/// Stateless service for batch workflow transitions.
pub struct BatchWorkflow;

impl BatchWorkflow {
    fn invalid(state: BatchState, action: &'static str) -> OpeningBalanceError {
        OpeningBalanceError::InvalidTransition {
            batch_id: state.batch_id,
            action,
            status: state.status,
        }
    }

    fn required_reason(reason: Option<&str>, what: &'static str) -> Result<String, OpeningBalanceError> {
        reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(ToString::to_string)
            .ok_or(OpeningBalanceError::ReasonRequired(what))
    }

    /// Replace header and lines; the batch returns to Draft.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the batch is Draft, Submitted or Rejected.
    pub fn update(state: BatchState) -> Result<BatchTransition, OpeningBalanceError> {
        if state.status.is_editable() {
            Ok(BatchTransition::Update {
                new_status: BatchStatus::Draft,
            })
        } else {
            Err(Self::invalid(state, "updated"))
        }
    }

    /// Submit a draft for approval.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the batch is Draft.
    pub fn submit(state: BatchState, submitted_by: Uuid) -> Result<BatchTransition, OpeningBalanceError> {
        match state.status {
            BatchStatus::Draft => Ok(BatchTransition::Submit {
                new_status: BatchStatus::Submitted,
                submitted_by,
                submitted_at: Utc::now(),
            }),
            _ => Err(Self::invalid(state, "submitted")),
        }
    }

    /// Approve a submitted batch.
    ///
    /// A completed edit cycle is closed by resetting the edit-request status.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the batch is Submitted.
    pub fn approve(
        state: BatchState,
        approved_by: Uuid,
        comment: Option<&str>,
    ) -> Result<BatchTransition, OpeningBalanceError> {
        match state.status {
            BatchStatus::Submitted => Ok(BatchTransition::Approve {
                new_status: BatchStatus::Approved,
                approved_by,
                approved_at: Utc::now(),
                comment: comment
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(ToString::to_string),
                edit_request_status: match state.edit_request_status {
                    EditRequestStatus::Approved => EditRequestStatus::None,
                    other => other,
                },
            }),
            _ => Err(Self::invalid(state, "approved")),
        }
    }

    /// Reject a submitted batch.
    ///
    /// # Errors
    ///
    /// `ReasonRequired` if the reason is blank, `InvalidTransition` unless
    /// the batch is Submitted.
    pub fn reject(
        state: BatchState,
        rejected_by: Uuid,
        reason: Option<&str>,
    ) -> Result<BatchTransition, OpeningBalanceError> {
        let reason = Self::required_reason(reason, "Rejection")?;
        match state.status {
            BatchStatus::Submitted => Ok(BatchTransition::Reject {
                new_status: BatchStatus::Rejected,
                rejected_by,
                rejected_at: Utc::now(),
                reason,
            }),
            _ => Err(Self::invalid(state, "rejected")),
        }
    }

    /// Cancel a draft.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the batch is Draft and has no posted
    /// journal.
    pub fn cancel(state: BatchState) -> Result<BatchTransition, OpeningBalanceError> {
        match state.status {
            BatchStatus::Draft if !state.has_journal => Ok(BatchTransition::Cancel),
            _ => Err(Self::invalid(state, "cancelled")),
        }
    }

    /// Request permission to edit an approved batch.
    ///
    /// # Errors
    ///
    /// `ReasonRequired`, `EditRequiresApprovedBatch` or
    /// `EditRequestAlreadyPending`.
    pub fn request_edit(
        state: BatchState,
        requested_by: Uuid,
        reason: Option<&str>,
    ) -> Result<BatchTransition, OpeningBalanceError> {
        let reason = Self::required_reason(reason, "Edit request")?;
        if state.status != BatchStatus::Approved {
            return Err(OpeningBalanceError::EditRequiresApprovedBatch {
                batch_id: state.batch_id,
                status: state.status,
            });
        }
        if state.edit_request_status == EditRequestStatus::Pending {
            return Err(OpeningBalanceError::EditRequestAlreadyPending(state.batch_id));
        }
        Ok(BatchTransition::RequestEdit {
            edit_request_status: EditRequestStatus::Pending,
            requested_by,
            requested_at: Utc::now(),
            reason,
        })
    }

    /// Decide a pending edit request.
    ///
    /// # Errors
    ///
    /// `NoPendingEditRequest` if nothing is pending, `ReasonRequired` when
    /// refusing without a reason.
    pub fn decide_edit(
        state: BatchState,
        reviewed_by: Uuid,
        decision: EditDecision,
        reason: Option<&str>,
    ) -> Result<BatchTransition, OpeningBalanceError> {
        if state.status != BatchStatus::Approved
            || state.edit_request_status != EditRequestStatus::Pending
        {
            return Err(OpeningBalanceError::NoPendingEditRequest(state.batch_id));
        }
        match decision {
            EditDecision::Approve => Ok(BatchTransition::ApproveEdit {
                new_status: BatchStatus::Draft,
                edit_request_status: EditRequestStatus::Approved,
                reviewed_by,
                reviewed_at: Utc::now(),
            }),
            EditDecision::Reject => Ok(BatchTransition::RejectEdit {
                edit_request_status: EditRequestStatus::Rejected,
                reviewed_by,
                reviewed_at: Utc::now(),
                reason: Self::required_reason(reason, "Edit rejection")?,
            }),
        }
    }

    /// Returns true if `from` can move to `to` through some operation.
    #[must_use]
    pub fn is_valid_transition(from: BatchStatus, to: BatchStatus) -> bool {
        matches!(
            (from, to),
            (BatchStatus::Draft | BatchStatus::Submitted | BatchStatus::Rejected, BatchStatus::Draft)
                | (BatchStatus::Draft, BatchStatus::Submitted)
                | (BatchStatus::Submitted, BatchStatus::Approved | BatchStatus::Rejected)
                | (BatchStatus::Approved, BatchStatus::Draft)
        )
    }
}
