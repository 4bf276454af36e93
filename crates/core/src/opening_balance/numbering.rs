//! Batch number generation.
//!
//! Numbers look like `OB-26-030012`: prefix, two-digit year, two-digit month,
//! then a sequence of at least four digits. The sequence runs per year, so
//! the month segment is informational only.

use chrono::NaiveDate;

/// Minimum width of the sequence segment.
pub const SEQUENCE_WIDTH: usize = 4;

/// Attempts made to claim a free number before giving up.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 5;

/// The `PREFIX-YY-` part shared by every number issued in a year.
#[must_use]
pub fn year_prefix(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}-{}-", date.format("%y"))
}

/// Formats a batch number.
#[must_use]
pub fn format_batch_number(prefix: &str, date: NaiveDate, sequence: u32) -> String {
    format!(
        "{}{}{:0width$}",
        year_prefix(prefix, date),
        date.format("%m"),
        sequence,
        width = SEQUENCE_WIDTH
    )
}

/// Extracts the sequence from a number issued in the same year as `date`.
///
/// Returns `None` for numbers from other years or other prefixes, and for
/// anything that does not parse.
#[must_use]
pub fn parse_sequence(prefix: &str, date: NaiveDate, number: &str) -> Option<u32> {
    let rest = number.strip_prefix(&year_prefix(prefix, date))?;
    let month = rest.get(..2)?;
    if !month.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let sequence = rest.get(2..)?;
    if sequence.is_empty() || !sequence.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    sequence.parse().ok()
}

/// Next sequence after the highest one found among `existing`.
#[must_use]
pub fn next_sequence<'a>(
    prefix: &str,
    date: NaiveDate,
    existing: impl IntoIterator<Item = &'a str>,
) -> u32 {
    existing
        .into_iter()
        .filter_map(|number| parse_sequence(prefix, date, number))
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Next batch number given the numbers already issued.
#[must_use]
pub fn next_batch_number<'a>(
    prefix: &str,
    date: NaiveDate,
    existing: impl IntoIterator<Item = &'a str>,
) -> String {
    format_batch_number(prefix, date, next_sequence(prefix, date, existing))
}
