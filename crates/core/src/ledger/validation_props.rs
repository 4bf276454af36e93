//! Property-based tests for journal line validation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::entry::{EntryType, JournalLine};
use super::journal::JournalDraft;
use super::validation::{LedgerValidationError, validate_lines};

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate an entry type.
fn entry_type_strategy() -> impl Strategy<Value = EntryType> {
    prop_oneof![Just(EntryType::Debit), Just(EntryType::Credit)]
}

fn make_line(entry_type: EntryType, amount: Decimal) -> JournalLine {
    JournalLine {
        account_id: 1,
        entry_type,
        amount,
        description: String::new(),
        entity: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Zero amount lines are rejected.
    #[test]
    fn prop_zero_amount_rejected(
        entry_type in entry_type_strategy(),
        other_amount in positive_amount(),
    ) {
        let opposite = match entry_type {
            EntryType::Debit => EntryType::Credit,
            EntryType::Credit => EntryType::Debit,
        };
        let lines = vec![
            make_line(entry_type, Decimal::ZERO),
            make_line(opposite, other_amount),
        ];
        prop_assert_eq!(validate_lines(&lines), Err(LedgerValidationError::InvalidAmount));
    }

    /// Any draft built from pairs validates and has equal column totals.
    #[test]
    fn prop_paired_drafts_always_balance(
        amounts in prop::collection::vec(positive_amount(), 1..50),
    ) {
        let mut draft = JournalDraft::new("prop");
        for (i, amount) in amounts.iter().enumerate() {
            let account = i32::try_from(i).unwrap_or(i32::MAX);
            draft.push_pair(account, account + 1, *amount, "line", None);
        }
        prop_assert_eq!(draft.total_debit(), draft.total_credit());
        prop_assert!(draft.validate().is_ok());
    }

    /// Lines whose columns differ are reported as unbalanced.
    #[test]
    fn prop_mismatched_columns_rejected(
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        prop_assume!(debit != credit);
        let lines = vec![
            make_line(EntryType::Debit, debit),
            make_line(EntryType::Credit, credit),
        ];
        prop_assert_eq!(
            validate_lines(&lines),
            Err(LedgerValidationError::Unbalanced { debits: debit, credits: credit })
        );
    }
}
