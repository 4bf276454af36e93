//! Journal draft builder.
//!
//! Lines are only ever added as a debit/credit pair of the same amount, so a
//! draft is balanced at every point of its construction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::{EntityRef, EntryType, JournalLine};
use super::validation::{LedgerValidationError, validate_lines};

/// An in-memory journal awaiting persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalDraft {
    /// Journal memo.
    pub memo: String,
    lines: Vec<JournalLine>,
}

impl JournalDraft {
    /// Creates an empty draft with the given memo.
    #[must_use]
    pub fn new(memo: impl Into<String>) -> Self {
        Self {
            memo: memo.into(),
            lines: Vec::new(),
        }
    }

    /// Appends a debit line and its mirroring credit line.
    ///
    /// Both lines carry the same description and entity tag.
    pub fn push_pair(
        &mut self,
        debit_account_id: i32,
        credit_account_id: i32,
        amount: Decimal,
        description: &str,
        entity: Option<EntityRef>,
    ) {
        self.lines.push(JournalLine {
            account_id: debit_account_id,
            entry_type: EntryType::Debit,
            amount,
            description: description.to_string(),
            entity: entity.clone(),
        });
        self.lines.push(JournalLine {
            account_id: credit_account_id,
            entry_type: EntryType::Credit,
            amount,
            description: description.to_string(),
            entity,
        });
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[JournalLine] {
        &self.lines
    }

    /// Returns true if no lines have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of the debit column.
    #[must_use]
    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(JournalLine::debit).sum()
    }

    /// Sum of the credit column.
    #[must_use]
    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(JournalLine::credit).sum()
    }

    /// Runs ledger validation over the finished draft.
    ///
    /// # Errors
    ///
    /// Returns a `LedgerValidationError` if the lines violate a ledger rule.
    pub fn validate(&self) -> Result<(), LedgerValidationError> {
        validate_lines(&self.lines)
    }
}
