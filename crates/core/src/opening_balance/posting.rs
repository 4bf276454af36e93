//! Posting engine: turns resolved batch lines into a balanced journal.
//!
//! Each party line with a net base balance of at least `net_tolerance()`
//! produces one debit/credit pair against its control account and Owner's
//! Equity:
//!
//! | party    | net  | debit      | credit     |
//! |----------|------|------------|------------|
//! | customer | > 0  | AR         | Equity     |
//! | customer | < 0  | Equity     | AR         |
//! | supplier | < 0  | Equity     | AP         |
//! | supplier | > 0  | AP         | Equity     |

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{EntityRef, JournalDraft};

use super::error::OpeningBalanceError;
use super::types::{PartyType, ResolvedLine};

/// Net balances smaller than this are treated as zero and not posted.
#[must_use]
pub fn net_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Control accounts a batch posts against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlAccountKind {
    /// Accounts Receivable.
    Receivable,
    /// Accounts Payable.
    Payable,
    /// Owner's Equity.
    Equity,
}

impl ControlAccountKind {
    /// All kinds, in resolution order.
    pub const ALL: [Self; 3] = [Self::Receivable, Self::Payable, Self::Equity];

    /// Chart-of-accounts subtype used to find the account when no id is configured.
    #[must_use]
    pub const fn subtype(self) -> &'static str {
        match self {
            Self::Receivable => "accounts_receivable",
            Self::Payable => "accounts_payable",
            Self::Equity => "owner_equity",
        }
    }
}

impl fmt::Display for ControlAccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Receivable => "Accounts Receivable",
            Self::Payable => "Accounts Payable",
            Self::Equity => "Owner's Equity",
        })
    }
}

/// Resolved chart-of-accounts ids for posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlAccounts {
    /// Accounts Receivable id.
    pub receivable: i32,
    /// Accounts Payable id.
    pub payable: i32,
    /// Owner's Equity id.
    pub equity: i32,
}

impl ControlAccounts {
    /// Resolves every control account through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `MissingControlAccount` naming the first kind `lookup` cannot resolve.
    pub fn resolve<F>(mut lookup: F) -> Result<Self, OpeningBalanceError>
    where
        F: FnMut(ControlAccountKind) -> Option<i32>,
    {
        let mut find = |kind| lookup(kind).ok_or(OpeningBalanceError::MissingControlAccount(kind));
        Ok(Self {
            receivable: find(ControlAccountKind::Receivable)?,
            payable: find(ControlAccountKind::Payable)?,
            equity: find(ControlAccountKind::Equity)?,
        })
    }

    /// The control account a party type posts to.
    #[must_use]
    pub const fn for_party(&self, party_type: PartyType) -> i32 {
        match party_type {
            PartyType::Customer => self.receivable,
            PartyType::Supplier => self.payable,
        }
    }
}

/// One posting pair derived from a batch line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingPair {
    /// Account debited.
    pub debit_account_id: i32,
    /// Account credited.
    pub credit_account_id: i32,
    /// Positive base amount.
    pub amount: Decimal,
}

/// Stateless posting engine.
pub struct PostingEngine;

impl PostingEngine {
    /// Posting pair for one line, or `None` when its net is below tolerance.
    #[must_use]
    pub fn pair_for_line(line: &ResolvedLine, accounts: &ControlAccounts) -> Option<PostingPair> {
        let net = line.net_base();
        if net.abs() < net_tolerance() {
            return None;
        }

        let control = accounts.for_party(line.party_type);
        // A positive net is a debit balance on the control account for
        // both party types; only the natural side differs.
        let (debit_account_id, credit_account_id) = if net > Decimal::ZERO {
            (control, accounts.equity)
        } else {
            (accounts.equity, control)
        };

        Some(PostingPair {
            debit_account_id,
            credit_account_id,
            amount: net.abs(),
        })
    }

    /// Builds the journal for a batch.
    ///
    /// # Errors
    ///
    /// Returns `NothingToPost` when no line produces a pair, or a ledger
    /// validation error if the finished journal is rejected.
    pub fn build_journal(
        batch_number: &str,
        lines: &[ResolvedLine],
        accounts: &ControlAccounts,
    ) -> Result<JournalDraft, OpeningBalanceError> {
        let mut journal = JournalDraft::new(format!("Opening balance batch {batch_number}"));

        for line in lines {
            let Some(pair) = Self::pair_for_line(line, accounts) else {
                continue;
            };
            let description = line_description(line);
            journal.push_pair(
                pair.debit_account_id,
                pair.credit_account_id,
                pair.amount,
                &description,
                Some(EntityRef {
                    entity_type: line.party_type.as_str().to_string(),
                    entity_id: line.party_id,
                }),
            );
        }

        if journal.is_empty() {
            return Err(OpeningBalanceError::NothingToPost);
        }
        journal.validate()?;
        Ok(journal)
    }
}

fn line_description(line: &ResolvedLine) -> String {
    let base = format!("Opening balance - {} #{}", line.party_type, line.party_id);
    match &line.notes {
        Some(notes) => format!("{base}: {notes}"),
        None => base,
    }
}
