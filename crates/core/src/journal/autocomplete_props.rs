//! Property-based tests for the auto-complete assistant.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::autocomplete::{AutoCompleteAssistant, AutoCompleteOptions};
use super::types::{JournalLine, JournalType, Side};

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn journal_type() -> impl Strategy<Value = JournalType> {
    prop::sample::select(JournalType::ALL.to_vec())
}

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Debit), Just(Side::Credit)]
}

fn tax_code() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(vec![
        "N16".to_string(),
        "R8".to_string(),
        "EXO".to_string(),
        "n16".to_string(),
        "UNKNOWN".to_string(),
    ]))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A completed entry always balances exactly.
    #[test]
    fn prop_completion_balances(
        journal_type in journal_type(),
        side in side(),
        amount in positive_amount(),
        tax_code in tax_code(),
    ) {
        let main = JournalLine::on_side(side, "601", amount);
        let options = AutoCompleteOptions {
            journal_type,
            tax_code,
            counterpart_account: None,
        };
        let completion = AutoCompleteAssistant::default().complete(&main, &options);

        let debit: Decimal = completion.lines.iter().map(JournalLine::debit_amount).sum();
        let credit: Decimal = completion.lines.iter().map(JournalLine::credit_amount).sum();
        prop_assert_eq!(debit, credit);
        let count = completion.lines.len();
        prop_assert!(count == 2 || count == 3, "unexpected line count {}", count);
        prop_assert_eq!(&completion.lines[0], &main);
    }

    /// The counterpart sits on the opposite side, on a candidate account.
    #[test]
    fn prop_counterpart_opposes_main_line(
        journal_type in journal_type(),
        side in side(),
        amount in positive_amount(),
    ) {
        let main = JournalLine::on_side(side, "471", amount);
        let completion = AutoCompleteAssistant::default()
            .complete(&main, &AutoCompleteOptions::new(journal_type));

        let proposal = completion.counterpart.clone().unwrap();
        let line = &completion.lines[proposal.line_index];
        prop_assert_eq!(line.posted_side(), Some((side.opposite(), amount)));
        prop_assert!(
            proposal.candidates.contains(&proposal.account),
            "{:?} not among {:?}",
            proposal.account,
            proposal.candidates
        );
        prop_assert!(completion.requires_confirmation(), "guessed counterpart must need confirmation");
    }

    /// Non-positive main amounts produce no extra lines.
    #[test]
    fn prop_non_positive_amount_is_left_alone(
        journal_type in journal_type(),
        side in side(),
        cents in -100_000i64..=0,
    ) {
        let main = JournalLine::on_side(side, "601", Decimal::new(cents, 2));
        let options = AutoCompleteOptions::new(journal_type).with_tax_code("N16");
        let completion = AutoCompleteAssistant::default().complete(&main, &options);

        prop_assert_eq!(completion.lines.len(), 1);
        prop_assert!(completion.counterpart.is_none(), "unexpected counterpart {:?}", completion.counterpart);
    }
}
