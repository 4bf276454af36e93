//! History action names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Action recorded in the history log for a batch lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryAction {
    /// Batch created.
    Created,
    /// Batch header or lines replaced.
    Updated,
    /// Batch submitted for approval.
    Submitted,
    /// Batch approved and posted.
    Approved,
    /// Batch rejected by an approver.
    Rejected,
    /// Draft batch cancelled.
    Cancelled,
    /// Edit of an approved batch requested.
    EditRequested,
    /// Edit request granted.
    EditRequestApproved,
    /// Edit request refused.
    EditRequestRejected,
}

impl HistoryAction {
    /// Stored action name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Updated => "UPDATED",
            Self::Submitted => "SUBMITTED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
            Self::EditRequested => "EDIT_REQUESTED",
            Self::EditRequestApproved => "EDIT_REQUEST_APPROVED",
            Self::EditRequestRejected => "EDIT_REQUEST_REJECTED",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
