//! Journal line domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Type of journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit entry (increases assets/expenses, decreases liabilities/equity/revenue).
    Debit,
    /// Credit entry (decreases assets/expenses, increases liabilities/equity/revenue).
    Credit,
}

/// Sub-ledger entity a journal line is tagged with (a customer or supplier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Entity kind as stored on the journal line, e.g. `Customer`.
    pub entity_type: String,
    /// Entity id.
    pub entity_id: i32,
}

/// A single line of a journal that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Chart-of-accounts id.
    pub account_id: i32,
    /// Whether this is a debit or credit.
    pub entry_type: EntryType,
    /// Amount in base currency. Always positive.
    pub amount: Decimal,
    /// Line description.
    pub description: String,
    /// Optional sub-ledger tag.
    pub entity: Option<EntityRef>,
}

impl JournalLine {
    /// Debit column value (zero for credit lines).
    #[must_use]
    pub fn debit(&self) -> Decimal {
        match self.entry_type {
            EntryType::Debit => self.amount,
            EntryType::Credit => Decimal::ZERO,
        }
    }

    /// Credit column value (zero for debit lines).
    #[must_use]
    pub fn credit(&self) -> Decimal {
        match self.entry_type {
            EntryType::Debit => Decimal::ZERO,
            EntryType::Credit => self.amount,
        }
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.entry_type {
            EntryType::Debit => self.amount,
            EntryType::Credit => -self.amount,
        }
    }
}
