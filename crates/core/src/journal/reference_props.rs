//! Property-based tests for reference generation and parsing.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

use super::catalog::Catalog;
use super::reference::{ParsedReference, ReferenceGenerator, parse_reference, validate_reference};
use super::sequence::{FixedSequence, InMemorySequence};
use super::types::JournalType;

fn journal_type() -> impl Strategy<Value = JournalType> {
    prop::sample::select(JournalType::ALL.to_vec())
}

/// Any valid calendar date with a four-digit year.
fn any_date() -> impl Strategy<Value = NaiveDate> {
    (0i32..=9999, 0u32..366).prop_map(|(year, offset)| {
        let first = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
        first
            .checked_add_days(chrono::Days::new(u64::from(offset)))
            .filter(|date| date.year() == year)
            .unwrap_or(first)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Generated references have the canonical shape and carry the journal prefix.
    #[test]
    fn prop_generated_reference_format(
        journal_type in journal_type(),
        date in any_date(),
        sequence in 1u16..=999,
    ) {
        let catalog = Catalog::builtin();
        let generator = ReferenceGenerator::new(catalog.clone(), FixedSequence(sequence));
        let reference = generator.generate(journal_type, date).unwrap();

        let prefix = &catalog.journal_type(journal_type).reference_prefix;
        let suffix = format!("-{sequence:03}");
        prop_assert!(validate_reference(&reference), "malformed reference {}", reference);
        prop_assert!(reference.starts_with(prefix.as_str()), "{} lacks prefix {}", reference, prefix);
        prop_assert!(reference.ends_with(&suffix), "{} lacks suffix {}", reference, suffix);
    }

    /// Parsing a generated reference gives back its components.
    #[test]
    fn prop_parse_inverts_generate(
        journal_type in journal_type(),
        date in any_date(),
        sequence in 1u16..=999,
    ) {
        let generator = ReferenceGenerator::new(Catalog::builtin(), FixedSequence(sequence));
        let reference = generator.generate(journal_type, date).unwrap();

        prop_assert_eq!(
            generator.parse(&reference),
            Some(ParsedReference { journal_type, date, sequence })
        );
    }

    /// Successive references for one journal and day are strictly increasing.
    #[test]
    fn prop_in_memory_references_increase(
        journal_type in journal_type(),
        date in any_date(),
        count in 2usize..20,
    ) {
        let generator = ReferenceGenerator::new(Catalog::builtin(), InMemorySequence::new());
        let sequences: Vec<u16> = (0..count)
            .map(|_| {
                let reference = generator.generate(journal_type, date).unwrap();
                generator.parse(&reference).unwrap().sequence
            })
            .collect();

        prop_assert_eq!(sequences[0], 1);
        prop_assert!(
            sequences.windows(2).all(|pair| pair[1] == pair[0] + 1),
            "non-consecutive sequences {:?}",
            sequences
        );
    }

    /// Arbitrary strings that fail the shape check never parse.
    #[test]
    fn prop_rejected_strings_do_not_parse(input in "\\PC{0,20}") {
        if !validate_reference(&input) {
            prop_assert_eq!(parse_reference(&Catalog::builtin(), &input), None);
        }
    }
}
