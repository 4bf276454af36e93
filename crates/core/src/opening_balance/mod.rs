//! Opening balance batches.
//!
//! A batch records the balances owed by customers and to suppliers when a
//! company starts using the ledger. This module holds everything about a
//! batch that does not touch storage:
//! - `types` - statuses, party types, line inputs and resolved lines
//! - `validation` - field rules, currency defaulting and base amounts
//! - `numbering` - `PREFIX-YY-MMSEQ` batch numbers
//! - `posting` - journal construction against control accounts
//! - `workflow` - draft/submit/approve/reject and edit-request transitions

pub mod error;
pub mod numbering;
pub mod posting;
pub mod types;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod posting_props;
#[cfg(test)]
mod workflow_props;

/// History log module name for batch events.
pub const HISTORY_MODULE: &str = "opening_balance";

pub use error::OpeningBalanceError;
pub use posting::{ControlAccountKind, ControlAccounts, PostingEngine, PostingPair, net_tolerance};
pub use types::{
    BatchInput, BatchLineInput, BatchSnapshot, BatchStatus, BatchTotals, EditDecision,
    EditRequestStatus, PartyType, ResolvedLine, ValidatedBatch,
};
pub use validation::{clean_text, currencies_needing_rates, validate_batch};
pub use workflow::{BatchState, BatchTransition, BatchWorkflow};
