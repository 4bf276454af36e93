//! Batch validation: field checks, currency resolution and base amounts.
//!
//! Lookups that need storage (party existence, stored exchange rates) are
//! injected as closures so this module stays free of I/O.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::currency::{is_storable_amount, is_storable_rate, normalize_code, to_base};

use super::error::OpeningBalanceError;
use super::types::{BatchInput, BatchLineInput, BatchTotals, PartyType, ResolvedLine, ValidatedBatch};

/// Trims free text and drops it when nothing is left.
#[must_use]
pub fn clean_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Currency of a line after defaulting and normalization.
fn line_currency(
    index: usize,
    line: &BatchLineInput,
    base_currency: &str,
) -> Result<String, OpeningBalanceError> {
    match line.currency_code.as_deref().map(str::trim) {
        None | Some("") => Ok(base_currency.to_string()),
        Some(raw) => normalize_code(raw).ok_or_else(|| OpeningBalanceError::InvalidLine {
            line: index,
            reason: format!("invalid currency code '{raw}'"),
        }),
    }
}

/// Currencies whose rate must be looked up because no line supplies one.
///
/// Invalid codes are skipped here and reported by `validate_batch`.
#[must_use]
pub fn currencies_needing_rates(input: &BatchInput, base_currency: &str) -> BTreeSet<String> {
    input
        .lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.fx_rate_to_base.is_none())
        .filter_map(|(i, line)| line_currency(i + 1, line, base_currency).ok())
        .filter(|code| code != base_currency)
        .collect()
}

fn check_amounts(index: usize, line: &BatchLineInput) -> Result<(), OpeningBalanceError> {
    let invalid = |reason: &str| OpeningBalanceError::InvalidLine {
        line: index,
        reason: reason.to_string(),
    };

    if line.party_id <= 0 {
        return Err(invalid("party_id must be a positive integer"));
    }
    if line.debit_foreign.is_sign_negative() || line.credit_foreign.is_sign_negative() {
        return Err(invalid("debit_foreign and credit_foreign must not be negative"));
    }
    if !is_storable_amount(line.debit_foreign) || !is_storable_amount(line.credit_foreign) {
        return Err(invalid(
            "amounts must be below 1000000000000000 with at most 4 decimal places",
        ));
    }
    if line.debit_foreign.is_zero() && line.credit_foreign.is_zero() {
        return Err(invalid("either debit_foreign or credit_foreign must be non-zero"));
    }
    Ok(())
}

fn base_amount(index: usize, amount: Decimal, rate: Decimal) -> Result<Decimal, OpeningBalanceError> {
    to_base(amount, rate)
        .filter(|base| is_storable_amount(*base))
        .ok_or_else(|| OpeningBalanceError::InvalidLine {
            line: index,
            reason: "base amount is too large to store".to_string(),
        })
}

/// Validates a batch and resolves every line to base currency.
///
/// * `base_currency` - upper-cased company base currency
/// * `party_exists` - returns true if the party belongs to the company
/// * `rate_lookup` - stored rate from a currency into `base_currency` on a date
///
/// Lines in the base currency always use a rate of one.
///
/// # Errors
///
/// Returns the first validation failure found, in line order.
pub fn validate_batch<P, R>(
    input: &BatchInput,
    base_currency: &str,
    party_exists: P,
    rate_lookup: R,
) -> Result<ValidatedBatch, OpeningBalanceError>
where
    P: Fn(PartyType, i32) -> bool,
    R: Fn(&str, NaiveDate) -> Option<Decimal>,
{
    let opening_date = input
        .opening_date
        .ok_or(OpeningBalanceError::OpeningDateRequired)?;

    if input.lines.is_empty() {
        return Err(OpeningBalanceError::NoLines);
    }

    let mut seen = HashSet::with_capacity(input.lines.len());
    let mut lines = Vec::with_capacity(input.lines.len());

    for (i, line) in input.lines.iter().enumerate() {
        let index = i + 1;
        check_amounts(index, line)?;

        if !seen.insert((line.party_type, line.party_id)) {
            return Err(OpeningBalanceError::DuplicateParty {
                party_type: line.party_type,
                party_id: line.party_id,
            });
        }
        if !party_exists(line.party_type, line.party_id) {
            return Err(OpeningBalanceError::UnknownParty {
                party_type: line.party_type,
                party_id: line.party_id,
            });
        }

        let currency_code = line_currency(index, line, base_currency)?;
        let fx_rate_to_base = if currency_code == base_currency {
            Decimal::ONE
        } else {
            let rate = match line.fx_rate_to_base {
                Some(rate) => rate,
                None => rate_lookup(&currency_code, opening_date).ok_or_else(|| {
                    OpeningBalanceError::ExchangeRateUnavailable {
                        currency: currency_code.clone(),
                        base: base_currency.to_string(),
                        date: opening_date,
                    }
                })?,
            };
            if rate <= Decimal::ZERO {
                return Err(OpeningBalanceError::InvalidLine {
                    line: index,
                    reason: "fx_rate_to_base must be positive".to_string(),
                });
            }
            if !is_storable_rate(rate) {
                return Err(OpeningBalanceError::InvalidLine {
                    line: index,
                    reason: "fx_rate_to_base must be below 10000000000 with at most 10 decimal places"
                        .to_string(),
                });
            }
            rate
        };

        let line_no = i32::try_from(index).map_err(|_| OpeningBalanceError::InvalidLine {
            line: index,
            reason: "too many lines in one batch".to_string(),
        })?;
        lines.push(ResolvedLine {
            line_no,
            party_type: line.party_type,
            party_id: line.party_id,
            debit_base: base_amount(index, line.debit_foreign, fx_rate_to_base)?,
            credit_base: base_amount(index, line.credit_foreign, fx_rate_to_base)?,
            currency_code,
            fx_rate_to_base,
            debit_foreign: line.debit_foreign,
            credit_foreign: line.credit_foreign,
            notes: clean_text(line.notes.as_deref()),
        });
    }

    // Posted journal totals are bounded by the sum of both sides.
    let totals = BatchTotals::try_from_lines(&lines)
        .filter(|t| {
            t.total_debit_base
                .checked_add(t.total_credit_base)
                .is_some_and(is_storable_amount)
        })
        .ok_or(OpeningBalanceError::TotalsOutOfRange)?;
    Ok(ValidatedBatch {
        opening_date,
        notes: clean_text(input.notes.as_deref()),
        lines,
        totals,
    })
}
