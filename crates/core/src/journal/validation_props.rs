//! Property-based tests for entry validation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::types::{JournalEntry, JournalLine, JournalType};
use super::validation::{ValidationIssue, validate_entry};

/// Strategy for positive amounts from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for optional amounts, including zero and negatives.
fn any_amount() -> impl Strategy<Value = Option<Decimal>> {
    prop_oneof![
        Just(None),
        Just(Some(Decimal::ZERO)),
        (-100_000i64..100_000i64).prop_map(|cents| Some(Decimal::new(cents, 2))),
    ]
}

fn journal_type() -> impl Strategy<Value = JournalType> {
    prop::sample::select(JournalType::ALL.to_vec())
}

fn accounting_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Lines with any mix of accounts and amounts.
fn arbitrary_line() -> impl Strategy<Value = JournalLine> {
    (prop::option::of("[0-9]{3}| "), any_amount(), any_amount()).prop_map(
        |(account_code, debit, credit)| JournalLine {
            account_code,
            debit,
            credit,
            ..JournalLine::default()
        },
    )
}

fn header(journal_type: JournalType, date: NaiveDate, lines: Vec<JournalLine>) -> JournalEntry {
    JournalEntry {
        date: Some(date),
        journal_type: Some(journal_type),
        description: Some("Écriture".to_string()),
        lines,
        ..JournalEntry::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Debits spread over several lines, settled by one credit line, are valid.
    #[test]
    fn prop_balanced_entries_are_valid(
        journal_type in journal_type(),
        date in accounting_date(),
        debits in prop::collection::vec(positive_amount(), 1..6),
    ) {
        let total: Decimal = debits.iter().copied().sum();
        let mut lines: Vec<_> = debits
            .into_iter()
            .map(|amount| JournalLine::debit("601", amount))
            .collect();
        lines.push(JournalLine::credit("401", total));

        let result = validate_entry(&header(journal_type, date, lines));

        prop_assert!(result.is_valid, "{:?}", result.errors);
        prop_assert!(result.is_balanced, "difference {:?}", result.difference());
        prop_assert_eq!(result.total_debit, total);
        prop_assert_eq!(result.total_credit, total);
    }

    /// An entry without lines yields exactly one error and is unbalanced.
    #[test]
    fn prop_no_lines_single_error(
        journal_type in prop::option::of(journal_type()),
        date in prop::option::of(accounting_date()),
        description in prop::option::of("[a-z ]{0,20}"),
    ) {
        let entry = JournalEntry {
            date,
            journal_type,
            description,
            ..JournalEntry::default()
        };
        let result = validate_entry(&entry);

        prop_assert!(!result.is_valid);
        prop_assert!(!result.is_balanced);
        prop_assert_eq!(result.errors, vec![ValidationIssue::NoLines]);
    }

    /// A line carrying both a positive debit and a positive credit is flagged.
    #[test]
    fn prop_both_sides_flagged(
        debit in positive_amount(),
        credit in positive_amount(),
        position in 0usize..3,
    ) {
        let mut lines = vec![
            JournalLine::debit("601", Decimal::ONE),
            JournalLine::credit("401", Decimal::ONE),
        ];
        let mut both = JournalLine::debit("471", debit);
        both.credit = Some(credit);
        lines.insert(position, both);

        let result = validate_entry(&header(JournalType::General, date_2025(), lines));

        let expected = ValidationIssue::BothDebitAndCredit { line: position + 1 };
        prop_assert!(!result.is_valid);
        prop_assert!(result.errors.contains(&expected), "{:?} not in {:?}", expected, result.errors);
    }

    /// Validation is pure: running it twice gives the same result.
    #[test]
    fn prop_validation_is_idempotent(
        journal_type in prop::option::of(journal_type()),
        date in prop::option::of(accounting_date()),
        lines in prop::collection::vec(arbitrary_line(), 0..6),
    ) {
        let entry = JournalEntry {
            date,
            journal_type,
            description: Some("x".to_string()),
            lines,
            ..JournalEntry::default()
        };
        let before = entry.clone();

        let first = validate_entry(&entry);
        let second = validate_entry(&entry);

        prop_assert_eq!(first, second);
        prop_assert_eq!(entry, before);
    }

    /// Totals always equal the sums of the line amounts.
    #[test]
    fn prop_totals_match_lines(lines in prop::collection::vec(arbitrary_line(), 1..6)) {
        let expected_debit: Decimal = lines.iter().filter_map(|line| line.debit).sum();
        let expected_credit: Decimal = lines.iter().filter_map(|line| line.credit).sum();

        let result = validate_entry(&header(JournalType::Cash, date_2025(), lines));

        prop_assert_eq!(result.total_debit, expected_debit);
        prop_assert_eq!(result.total_credit, expected_credit);
        prop_assert_eq!(result.is_valid, result.errors.is_empty());
    }
}

fn date_2025() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
}
