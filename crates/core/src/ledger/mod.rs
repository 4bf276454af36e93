//! Double-entry journal construction.
//!
//! This module implements the ledger side of posting:
//! - Journal lines (debits and credits) against chart-of-accounts ids
//! - A journal draft that can only grow by balanced debit/credit pairs
//! - Business rule validation for a finished set of lines

pub mod entry;
pub mod journal;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use entry::{EntityRef, EntryType, JournalLine};
pub use journal::JournalDraft;
pub use validation::{LedgerValidationError, validate_lines};
