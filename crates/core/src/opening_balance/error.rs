//! Opening balance error types.
//!
//! Every failure carries the HTTP status and wire code it is reported with,
//! so adapters never need to inspect messages.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::ledger::LedgerValidationError;

use super::posting::ControlAccountKind;
use super::types::{BatchStatus, PartyType};

/// Errors that can occur during opening balance operations.
#[derive(Debug, Error)]
pub enum OpeningBalanceError {
    // ========== Validation Errors ==========
    /// Batch header has no opening date.
    #[error("Opening date is required")]
    OpeningDateRequired,

    /// Batch has no lines.
    #[error("Batch must have at least one line")]
    NoLines,

    /// A line failed field validation.
    #[error("Line {line}: {reason}")]
    InvalidLine {
        /// 1-based line position.
        line: usize,
        /// What is wrong with the line.
        reason: String,
    },

    /// The same party appears on two lines of one batch.
    #[error("Duplicate line for {party_type} {party_id}")]
    DuplicateParty {
        /// Party kind.
        party_type: PartyType,
        /// Party id.
        party_id: i32,
    },

    /// A line references a party that does not exist in the company.
    #[error("{party_type} {party_id} does not exist")]
    UnknownParty {
        /// Party kind.
        party_type: PartyType,
        /// Party id.
        party_id: i32,
    },

    /// No rate could be found for a foreign-currency line.
    #[error("No exchange rate found for {currency} to {base} on {date}")]
    ExchangeRateUnavailable {
        /// Line currency.
        currency: String,
        /// Company base currency.
        base: String,
        /// Opening date.
        date: NaiveDate,
    },

    /// Batch totals are too large to store or post.
    #[error("Batch totals exceed the largest storable amount")]
    TotalsOutOfRange,

    /// Every line nets to zero, so there is nothing to post.
    #[error("Batch has no lines with a non-zero net balance to post")]
    NothingToPost,

    /// A reason is mandatory for this action.
    #[error("{0} reason is required")]
    ReasonRequired(&'static str),

    /// Edit requests apply to approved batches only.
    #[error("Edit can only be requested for an approved batch; batch {batch_id} is {status}")]
    EditRequiresApprovedBatch {
        /// Batch id.
        batch_id: i32,
        /// Current status.
        status: BatchStatus,
    },

    /// An edit request is already awaiting a decision.
    #[error("Batch {0} already has a pending edit request")]
    EditRequestAlreadyPending(i32),

    /// There is no pending edit request to decide.
    #[error("Batch {0} has no pending edit request")]
    NoPendingEditRequest(i32),

    /// The built journal failed ledger validation.
    #[error(transparent)]
    Ledger(#[from] LedgerValidationError),

    // ========== State Errors ==========
    /// Batch does not exist in the company.
    #[error("Batch {0} not found")]
    BatchNotFound(i32),

    /// Batch exists but is not in a status that allows the action.
    #[error("Batch {batch_id} not found or not in a status that allows it to be {action} (status: {status})")]
    InvalidTransition {
        /// Batch id.
        batch_id: i32,
        /// Past-tense action, e.g. `approved`.
        action: &'static str,
        /// Current status.
        status: BatchStatus,
    },

    /// The batch changed status between read and write.
    #[error("Batch {0} was modified concurrently")]
    ConcurrentModification(i32),

    /// The acting company is unknown.
    #[error("Company {0} not found")]
    CompanyNotFound(Uuid),

    // ========== Configuration Errors ==========
    /// A control account could not be resolved.
    #[error("{0} control account is not configured")]
    MissingControlAccount(ControlAccountKind),

    // ========== Database Errors ==========
    /// No free batch number could be claimed.
    #[error("Could not allocate a batch number after {0} attempts")]
    BatchNumberExhausted(u32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl OpeningBalanceError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::OpeningDateRequired
            | Self::NoLines
            | Self::InvalidLine { .. }
            | Self::DuplicateParty { .. }
            | Self::UnknownParty { .. }
            | Self::ExchangeRateUnavailable { .. }
            | Self::TotalsOutOfRange
            | Self::NothingToPost
            | Self::ReasonRequired(_)
            | Self::EditRequiresApprovedBatch { .. }
            | Self::EditRequestAlreadyPending(_)
            | Self::NoPendingEditRequest(_)
            | Self::Ledger(_)
            | Self::MissingControlAccount(_) => 400,

            Self::BatchNotFound(_)
            | Self::InvalidTransition { .. }
            | Self::ConcurrentModification(_)
            | Self::CompanyNotFound(_) => 404,

            Self::BatchNumberExhausted(_) | Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::OpeningDateRequired
            | Self::NoLines
            | Self::InvalidLine { .. }
            | Self::DuplicateParty { .. }
            | Self::UnknownParty { .. }
            | Self::ExchangeRateUnavailable { .. }
            | Self::TotalsOutOfRange
            | Self::NothingToPost
            | Self::ReasonRequired(_)
            | Self::EditRequiresApprovedBatch { .. }
            | Self::EditRequestAlreadyPending(_)
            | Self::NoPendingEditRequest(_)
            | Self::Ledger(_) => "VALIDATION_ERROR",

            Self::BatchNotFound(_)
            | Self::InvalidTransition { .. }
            | Self::ConcurrentModification(_)
            | Self::CompanyNotFound(_) => "NOT_FOUND",

            Self::MissingControlAccount(_) => "CONFIGURATION_ERROR",

            Self::BatchNumberExhausted(_) | Self::Database(_) => "DB_ERROR",
        }
    }

    /// Returns true if the error originated below the domain layer.
    ///
    /// Only these errors have internal detail worth hiding from clients.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::BatchNumberExhausted(_) | Self::Database(_))
    }
}
