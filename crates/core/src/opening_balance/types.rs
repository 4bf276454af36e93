//! Opening balance domain types.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of counterparty a batch line carries a balance for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PartyType {
    /// Receivable side.
    #[serde(alias = "customer", alias = "CUSTOMER")]
    Customer,
    /// Payable side.
    #[serde(alias = "supplier", alias = "SUPPLIER")]
    Supplier,
}

impl PartyType {
    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Supplier => "Supplier",
        }
    }

    /// Parses a stored or user-supplied name, ignoring case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("customer") {
            Some(Self::Customer)
        } else if raw.eq_ignore_ascii_case("supplier") {
            Some(Self::Supplier)
        } else {
            None
        }
    }
}

impl fmt::Display for PartyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Batch lifecycle status.
///
/// The integer codes are the persisted values and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Posted to the general ledger.
    Approved,
    /// Returned by an approver.
    Rejected,
    /// Editable working copy.
    Draft,
    /// Awaiting approval.
    Submitted,
}

impl BatchStatus {
    /// Persisted status code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Approved => 1,
            Self::Rejected => 2,
            Self::Draft => 3,
            Self::Submitted => 8,
        }
    }

    /// Maps a persisted code back to a status.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Approved),
            2 => Some(Self::Rejected),
            3 => Some(Self::Draft),
            8 => Some(Self::Submitted),
            _ => None,
        }
    }

    /// Lower-case name used in responses and diffs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Draft => "draft",
            Self::Submitted => "submitted",
        }
    }

    /// Returns true if the header and lines may be replaced in this status.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft | Self::Submitted | Self::Rejected)
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of the edit-request sub-workflow on an approved batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditRequestStatus {
    /// No edit request in flight.
    #[default]
    None,
    /// Last request was granted.
    Approved,
    /// Last request was refused.
    Rejected,
    /// A request awaits a decision.
    Pending,
}

impl EditRequestStatus {
    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for EditRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision on a pending edit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditDecision {
    /// Grant the edit; the batch returns to draft.
    Approve,
    /// Refuse the edit; the batch stays approved.
    Reject,
}

/// One line of a batch as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchLineInput {
    /// Customer or supplier.
    pub party_type: PartyType,
    /// Party id within the company.
    pub party_id: i32,
    /// Currency of the foreign amounts. Defaults to the base currency.
    #[serde(default)]
    pub currency_code: Option<String>,
    /// Caller-supplied rate to base. Looked up when absent.
    #[serde(default)]
    pub fx_rate_to_base: Option<Decimal>,
    /// Debit amount in the line currency.
    #[serde(default)]
    pub debit_foreign: Decimal,
    /// Credit amount in the line currency.
    #[serde(default)]
    pub credit_foreign: Decimal,
    /// Free-text line notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Header and lines for creating or replacing a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchInput {
    /// Date the opening balances are effective.
    #[serde(default)]
    pub opening_date: Option<NaiveDate>,
    /// Free-text batch notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Batch lines.
    #[serde(default)]
    pub lines: Vec<BatchLineInput>,
}

/// A validated line with its resolved rate and base amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLine {
    /// 1-based position within the batch.
    pub line_no: i32,
    /// Customer or supplier.
    pub party_type: PartyType,
    /// Party id within the company.
    pub party_id: i32,
    /// Upper-cased currency code.
    pub currency_code: String,
    /// Rate applied to reach base currency.
    pub fx_rate_to_base: Decimal,
    /// Debit amount in the line currency.
    pub debit_foreign: Decimal,
    /// Credit amount in the line currency.
    pub credit_foreign: Decimal,
    /// Debit converted to base currency.
    pub debit_base: Decimal,
    /// Credit converted to base currency.
    pub credit_base: Decimal,
    /// Free-text line notes.
    pub notes: Option<String>,
}

impl ResolvedLine {
    /// Net base balance, positive when the debit side is larger.
    #[must_use]
    pub fn net_base(&self) -> Decimal {
        self.debit_base - self.credit_base
    }
}

/// Denormalized batch totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTotals {
    /// Sum of line base debits.
    pub total_debit_base: Decimal,
    /// Sum of line base credits.
    pub total_credit_base: Decimal,
    /// Number of lines.
    pub line_count: i32,
}

impl BatchTotals {
    /// Totals over a set of resolved lines, or `None` on overflow.
    #[must_use]
    pub fn try_from_lines(lines: &[ResolvedLine]) -> Option<Self> {
        lines.iter().try_fold(Self::default(), |acc, line| {
            Some(Self {
                total_debit_base: acc.total_debit_base.checked_add(line.debit_base)?,
                total_credit_base: acc.total_credit_base.checked_add(line.credit_base)?,
                line_count: acc.line_count.checked_add(1)?,
            })
        })
    }
}

/// Output of batch validation, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBatch {
    /// Effective date.
    pub opening_date: NaiveDate,
    /// Trimmed batch notes.
    pub notes: Option<String>,
    /// Resolved lines in input order.
    pub lines: Vec<ResolvedLine>,
    /// Totals over `lines`.
    pub totals: BatchTotals,
}

/// Fields of a batch compared when recording an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSnapshot {
    /// Effective date.
    pub opening_date: NaiveDate,
    /// Batch notes.
    pub notes: Option<String>,
    /// Lifecycle status.
    pub status: BatchStatus,
    /// Number of lines.
    pub line_count: i32,
    /// Sum of line base debits.
    pub total_debit_base: Decimal,
    /// Sum of line base credits.
    pub total_credit_base: Decimal,
}

impl BatchSnapshot {
    /// Builds a snapshot. Amounts are normalized so `100` and `100.0000`
    /// compare equal once serialized.
    #[must_use]
    pub fn new(
        opening_date: NaiveDate,
        notes: Option<String>,
        status: BatchStatus,
        line_count: i32,
        total_debit_base: Decimal,
        total_credit_base: Decimal,
    ) -> Self {
        Self {
            opening_date,
            notes,
            status,
            line_count,
            total_debit_base: total_debit_base.normalize(),
            total_credit_base: total_credit_base.normalize(),
        }
    }

    /// Field names compared by `audit::diff_fields`.
    pub const DIFF_FIELDS: &'static [&'static str] = &[
        "opening_date",
        "notes",
        "status",
        "line_count",
        "total_debit_base",
        "total_credit_base",
    ];
}
