//! Double-entry validation of journal entries.
//!
//! Validation never fails: every problem found is collected into a
//! [`ValidationResult`]. Errors make the entry invalid; warnings are advisory.

use std::sync::Arc;

use grandlivre_shared::types::format_amount;
use rust_decimal::Decimal;
use thiserror::Error;

use super::catalog::Catalog;
use super::types::{JournalEntry, JournalType};

/// Default balance tolerance: totals differing by less than 0.01 balance.
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// A problem that prevents an entry from being valid.
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    // ========== Structural ==========
    /// Entry date is missing.
    #[error("Date is required")]
    MissingDate,

    /// Journal type is missing.
    #[error("Journal type is required")]
    MissingJournalType,

    /// Description is missing or blank.
    #[error("Description is required")]
    MissingDescription,

    /// Entry has no line at all.
    #[error("Entry must have at least one line")]
    NoLines,

    // ========== Line level ==========
    /// Line has no account.
    #[error("Line {line}: account is required")]
    MissingAccount {
        /// Line number.
        line: usize,
    },

    /// Line debit is negative.
    #[error("Line {line}: debit cannot be negative")]
    NegativeDebit {
        /// Line number.
        line: usize,
    },

    /// Line credit is negative.
    #[error("Line {line}: credit cannot be negative")]
    NegativeCredit {
        /// Line number.
        line: usize,
    },

    /// Line carries both a debit and a credit.
    #[error("Line {line}: cannot have both debit and credit")]
    BothDebitAndCredit {
        /// Line number.
        line: usize,
    },

    /// Line carries neither a debit nor a credit.
    #[error("Line {line}: must have either a debit or a credit")]
    NoAmount {
        /// Line number.
        line: usize,
    },

    // ========== Aggregate ==========
    /// No line on the debit side or none on the credit side.
    #[error("Missing debit or credit side: at least one debit line and one credit line are required")]
    MissingSide,

    /// Totals differ by at least the tolerance.
    #[error("Entry is not balanced: difference of {}", two_places(.difference))]
    Unbalanced {
        /// Absolute difference between total debit and total credit.
        difference: Decimal,
    },

    /// Totals cannot be computed because the amounts are too large.
    #[error("Amounts are too large to total")]
    AmountOverflow,
}

fn two_places(amount: &Decimal) -> String {
    format_amount(*amount)
}

impl ValidationIssue {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDate => "MISSING_DATE",
            Self::MissingJournalType => "MISSING_JOURNAL_TYPE",
            Self::MissingDescription => "MISSING_DESCRIPTION",
            Self::NoLines => "NO_LINES",
            Self::MissingAccount { .. } => "MISSING_ACCOUNT",
            Self::NegativeDebit { .. } => "NEGATIVE_DEBIT",
            Self::NegativeCredit { .. } => "NEGATIVE_CREDIT",
            Self::BothDebitAndCredit { .. } => "BOTH_DEBIT_AND_CREDIT",
            Self::NoAmount { .. } => "NO_AMOUNT",
            Self::MissingSide => "MISSING_SIDE",
            Self::Unbalanced { .. } => "UNBALANCED",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
        }
    }

    /// Line the issue refers to, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MissingAccount { line }
            | Self::NegativeDebit { line }
            | Self::NegativeCredit { line }
            | Self::BothDebitAndCredit { line }
            | Self::NoAmount { line } => Some(*line),
            _ => None,
        }
    }
}

/// Advisory findings that do not affect validity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    /// The journal requires a reference and none is set yet.
    #[error("Journal {journal_type} requires a reference; one will be generated")]
    ReferenceWillBeGenerated {
        /// Journal type of the entry.
        journal_type: JournalType,
    },

    /// VAT applies to the journal but no line carries a tax code.
    #[error("Journal {journal_type} applies VAT but no line carries a tax code")]
    MissingTaxLine {
        /// Journal type of the entry.
        journal_type: JournalType,
    },

    /// A line refers to a tax code the catalog does not know.
    #[error("Line {line}: unknown tax code {code}")]
    UnknownTaxCode {
        /// Line number.
        line: usize,
        /// The unknown code.
        code: String,
    },

    /// A line falls due before the entry date.
    #[error("Line {line}: due date is before the entry date")]
    DueDateBeforeEntryDate {
        /// Line number.
        line: usize,
    },
}

impl ValidationWarning {
    /// Returns the warning code for API responses.
    #[must_use]
    pub fn warning_code(&self) -> &'static str {
        match self {
            Self::ReferenceWillBeGenerated { .. } => "REFERENCE_WILL_BE_GENERATED",
            Self::MissingTaxLine { .. } => "MISSING_TAX_LINE",
            Self::UnknownTaxCode { .. } => "UNKNOWN_TAX_CODE",
            Self::DueDateBeforeEntryDate { .. } => "DUE_DATE_BEFORE_ENTRY_DATE",
        }
    }
}

/// Outcome of validating an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// True when `errors` is empty.
    pub is_valid: bool,
    /// Errors, in detection order.
    pub errors: Vec<ValidationIssue>,
    /// Warnings, in detection order.
    pub warnings: Vec<ValidationWarning>,
    /// Sum of line debits, zero when the sum overflows.
    pub total_debit: Decimal,
    /// Sum of line credits, zero when the sum overflows.
    pub total_credit: Decimal,
    /// True when the totals agree within the tolerance.
    pub is_balanced: bool,
}

impl ValidationResult {
    /// Error messages, in order.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Warning messages, in order.
    #[must_use]
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// Signed difference `total_debit - total_credit`, if representable.
    #[must_use]
    pub fn difference(&self) -> Option<Decimal> {
        self.total_debit.checked_sub(self.total_credit)
    }

    fn no_lines() -> Self {
        Self {
            is_valid: false,
            errors: vec![ValidationIssue::NoLines],
            warnings: Vec::new(),
            total_debit: Decimal::ZERO,
            total_credit: Decimal::ZERO,
            is_balanced: false,
        }
    }
}

/// Validates entries against double-entry rules.
#[derive(Debug, Clone)]
pub struct EntryValidator {
    catalog: Arc<Catalog>,
    tolerance: Decimal,
}

impl Default for EntryValidator {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

impl EntryValidator {
    /// Creates a validator with the default tolerance.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Overrides the balance tolerance (exclusive bound on |debit - credit|).
    ///
    /// Equal totals always balance, so a zero tolerance means exact balance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    /// Current balance tolerance.
    #[must_use]
    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Validates `entry`, collecting every error and warning.
    #[must_use]
    pub fn validate(&self, entry: &JournalEntry) -> ValidationResult {
        if entry.lines.is_empty() {
            return ValidationResult::no_lines();
        }

        let mut errors = Vec::new();

        if entry.date.is_none() {
            errors.push(ValidationIssue::MissingDate);
        }
        if entry.journal_type.is_none() {
            errors.push(ValidationIssue::MissingJournalType);
        }
        if entry
            .description
            .as_deref()
            .is_none_or(|description| description.trim().is_empty())
        {
            errors.push(ValidationIssue::MissingDescription);
        }

        let mut has_debit = false;
        let mut has_credit = false;

        for (index, line) in entry.lines.iter().enumerate() {
            let number = index + 1;
            let debit = line.debit_amount();
            let credit = line.credit_amount();

            if line.account().is_none() {
                errors.push(ValidationIssue::MissingAccount { line: number });
            }
            if debit < Decimal::ZERO {
                errors.push(ValidationIssue::NegativeDebit { line: number });
            }
            if credit < Decimal::ZERO {
                errors.push(ValidationIssue::NegativeCredit { line: number });
            }
            if debit > Decimal::ZERO && credit > Decimal::ZERO {
                errors.push(ValidationIssue::BothDebitAndCredit { line: number });
            }
            if debit.is_zero() && credit.is_zero() {
                errors.push(ValidationIssue::NoAmount { line: number });
            }

            has_debit |= debit > Decimal::ZERO;
            has_credit |= credit > Decimal::ZERO;
        }

        if !has_debit || !has_credit {
            errors.push(ValidationIssue::MissingSide);
        }

        let total_debit = entry.total_debit();
        let total_credit = entry.total_credit();
        let difference = total_debit
            .zip(total_credit)
            .and_then(|(debit, credit)| debit.checked_sub(credit))
            .map(|difference| difference.abs());

        let is_balanced = match difference {
            Some(difference) => {
                let balanced = difference.is_zero() || difference < self.tolerance;
                if !balanced {
                    errors.push(ValidationIssue::Unbalanced { difference });
                }
                balanced
            }
            None => {
                errors.push(ValidationIssue::AmountOverflow);
                false
            }
        };
        let total_debit = total_debit.unwrap_or_default();
        let total_credit = total_credit.unwrap_or_default();

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings: self.warnings(entry),
            total_debit,
            total_credit,
            is_balanced,
        }
    }

    fn warnings(&self, entry: &JournalEntry) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if let Some(journal_type) = entry.journal_type {
            let config = self.catalog.journal_type(journal_type);
            if config.requires_reference && !entry.has_reference() {
                warnings.push(ValidationWarning::ReferenceWillBeGenerated { journal_type });
            }
            if config.vat_applicable && entry.lines.iter().all(|line| line.tax_code.is_none()) {
                warnings.push(ValidationWarning::MissingTaxLine { journal_type });
            }
        }

        for (index, line) in entry.lines.iter().enumerate() {
            let number = index + 1;
            if let Some(code) = line.tax_code.as_deref() {
                if self.catalog.tax_code(code).is_none() {
                    warnings.push(ValidationWarning::UnknownTaxCode {
                        line: number,
                        code: code.to_string(),
                    });
                }
            }
            if let (Some(due), Some(date)) = (line.due_date, entry.date) {
                if due < date {
                    warnings.push(ValidationWarning::DueDateBeforeEntryDate { line: number });
                }
            }
        }

        warnings
    }
}

/// Validates `entry` with the built-in catalog and default tolerance.
#[must_use]
pub fn validate_entry(entry: &JournalEntry) -> ValidationResult {
    EntryValidator::default().validate(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::types::JournalLine;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn header(lines: Vec<JournalLine>) -> JournalEntry {
        JournalEntry {
            date: NaiveDate::from_ymd_opt(2025, 1, 15),
            journal_type: Some(JournalType::General),
            description: Some("Écriture de test".to_string()),
            lines,
            ..JournalEntry::default()
        }
    }

    #[test]
    fn test_balanced_entry_is_valid() {
        let entry = header(vec![
            JournalLine::debit("401", dec!(1000)),
            JournalLine::credit("701", dec!(1000)),
        ]);
        let result = validate_entry(&entry);

        assert!(result.is_valid, "{:?}", result.errors);
        assert!(result.is_balanced);
        assert!(result.errors.is_empty());
        assert_eq!(result.total_debit, dec!(1000));
        assert_eq!(result.total_credit, dec!(1000));
    }

    #[test]
    fn test_single_debit_line_misses_a_side() {
        let entry = header(vec![JournalLine::debit("401", dec!(1000))]);
        let result = validate_entry(&entry);

        assert!(!result.is_valid);
        assert!(!result.is_balanced);
        assert!(result.errors.contains(&ValidationIssue::MissingSide));
        assert!(
            result
                .error_messages()
                .iter()
                .any(|m| m.contains("Missing debit or credit side"))
        );
    }

    #[test]
    fn test_unbalanced_reports_difference() {
        let entry = header(vec![
            JournalLine::debit("401", dec!(500)),
            JournalLine::credit("701", dec!(300)),
        ]);
        let result = validate_entry(&entry);

        assert!(!result.is_valid);
        assert!(!result.is_balanced);
        assert_eq!(result.difference(), Some(dec!(200)));
        assert!(result.error_messages().iter().any(|m| m.contains("200.00")));
    }

    #[test]
    fn test_difference_is_absolute() {
        let entry = header(vec![
            JournalLine::debit("401", dec!(100)),
            JournalLine::credit("701", dec!(100.5)),
        ]);
        let result = validate_entry(&entry);
        assert_eq!(
            result.errors,
            vec![ValidationIssue::Unbalanced { difference: dec!(0.5) }]
        );
        assert_eq!(
            result.error_messages(),
            vec!["Entry is not balanced: difference of 0.50".to_string()]
        );
    }

    #[test]
    fn test_tolerance_is_exclusive() {
        let within = header(vec![
            JournalLine::debit("401", dec!(100.009)),
            JournalLine::credit("701", dec!(100)),
        ]);
        assert!(validate_entry(&within).is_balanced);

        let at_bound = header(vec![
            JournalLine::debit("401", dec!(100.01)),
            JournalLine::credit("701", dec!(100)),
        ]);
        assert!(!validate_entry(&at_bound).is_balanced);
    }

    #[test]
    fn test_custom_tolerance() {
        let entry = header(vec![
            JournalLine::debit("401", dec!(100.04)),
            JournalLine::credit("701", dec!(100)),
        ]);
        let validator = EntryValidator::default().with_tolerance(dec!(0.05));
        assert_eq!(validator.tolerance(), dec!(0.05));
        assert!(validator.validate(&entry).is_valid);
        assert!(!validate_entry(&entry).is_valid);
    }

    #[test]
    fn test_zero_tolerance_requires_exact_balance() {
        let validator = EntryValidator::default().with_tolerance(Decimal::ZERO);

        let exact = header(vec![
            JournalLine::debit("401", dec!(100)),
            JournalLine::credit("701", dec!(100.00)),
        ]);
        let result = validator.validate(&exact);
        assert!(result.is_balanced);
        assert!(result.is_valid, "{:?}", result.errors);

        let off = header(vec![
            JournalLine::debit("401", dec!(100.001)),
            JournalLine::credit("701", dec!(100)),
        ]);
        let result = validator.validate(&off);
        assert!(!result.is_balanced);
        assert_eq!(
            result.errors,
            vec![ValidationIssue::Unbalanced { difference: dec!(0.001) }]
        );
    }

    #[test]
    fn test_overflowing_totals_are_reported() {
        let entry = header(vec![
            JournalLine::debit("401", Decimal::MAX),
            JournalLine::debit("402", Decimal::MAX),
            JournalLine::credit("701", dec!(1)),
        ]);
        let result = validate_entry(&entry);

        assert!(!result.is_valid);
        assert!(!result.is_balanced);
        assert_eq!(result.errors, vec![ValidationIssue::AmountOverflow]);
        assert_eq!(result.total_debit, Decimal::ZERO);
        assert_eq!(result.total_credit, dec!(1));
        assert_eq!(result.error_messages(), vec!["Amounts are too large to total"]);
    }

    #[test]
    fn test_overflowing_difference_is_reported() {
        let entry = header(vec![
            JournalLine::debit("401", Decimal::MAX),
            JournalLine::credit("701", Decimal::MIN),
        ]);
        let result = validate_entry(&entry);

        assert!(!result.is_balanced);
        assert_eq!(
            result.errors,
            vec![
                ValidationIssue::NegativeCredit { line: 2 },
                ValidationIssue::MissingSide,
                ValidationIssue::AmountOverflow,
            ]
        );
        assert_eq!(result.total_debit, Decimal::MAX);
        assert_eq!(result.total_credit, Decimal::MIN);
        assert_eq!(result.difference(), None);
    }

    #[test]
    fn test_zero_lines_short_circuits() {
        let entry = JournalEntry::default();
        let result = validate_entry(&entry);

        assert_eq!(result.errors, vec![ValidationIssue::NoLines]);
        assert!(result.warnings.is_empty());
        assert!(!result.is_balanced);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_missing_header_fields_are_all_reported() {
        let entry = JournalEntry {
            description: Some("   ".to_string()),
            lines: vec![
                JournalLine::debit("401", dec!(10)),
                JournalLine::credit("701", dec!(10)),
            ],
            ..JournalEntry::default()
        };
        let result = validate_entry(&entry);

        assert_eq!(
            result.errors,
            vec![
                ValidationIssue::MissingDate,
                ValidationIssue::MissingJournalType,
                ValidationIssue::MissingDescription,
            ]
        );
        // balance is reported independently of header problems
        assert!(result.is_balanced);
    }

    #[test]
    fn test_line_errors_are_collected_in_order() {
        let mut both = JournalLine::debit("401", dec!(10));
        both.credit = Some(dec!(5));
        let mut negative = JournalLine::credit("701", dec!(-3));
        negative.account_code = None;

        let entry = header(vec![both, negative, JournalLine::empty()]);
        let result = validate_entry(&entry);

        assert_eq!(
            result.errors,
            vec![
                ValidationIssue::BothDebitAndCredit { line: 1 },
                ValidationIssue::MissingAccount { line: 2 },
                ValidationIssue::NegativeCredit { line: 2 },
                ValidationIssue::MissingAccount { line: 3 },
                ValidationIssue::NoAmount { line: 3 },
                ValidationIssue::Unbalanced { difference: dec!(8) },
            ]
        );
        assert_eq!(result.errors[1].line(), Some(2));
        assert_eq!(result.errors[5].line(), None);
    }

    #[test]
    fn test_explicit_zero_counts_as_no_amount() {
        let mut line = JournalLine::debit("401", Decimal::ZERO);
        line.credit = Some(Decimal::ZERO);
        let entry = header(vec![line, JournalLine::credit("701", dec!(1))]);
        let result = validate_entry(&entry);
        assert!(result.errors.contains(&ValidationIssue::NoAmount { line: 1 }));
        assert!(result.errors.contains(&ValidationIssue::MissingSide));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ValidationIssue::MissingSide.error_code(), "MISSING_SIDE");
        assert_eq!(
            ValidationIssue::Unbalanced { difference: dec!(1) }.error_code(),
            "UNBALANCED"
        );
        assert_eq!(ValidationIssue::NoAmount { line: 4 }.error_code(), "NO_AMOUNT");
        assert_eq!(ValidationIssue::AmountOverflow.error_code(), "AMOUNT_OVERFLOW");
    }

    #[test]
    fn test_reference_and_vat_warnings() {
        let mut entry = header(vec![
            JournalLine::debit("601", dec!(100)),
            JournalLine::credit("401", dec!(100)),
        ]);
        entry.journal_type = Some(JournalType::Purchase);
        let result = validate_entry(&entry);

        assert!(result.is_valid);
        assert_eq!(
            result.warnings,
            vec![
                ValidationWarning::ReferenceWillBeGenerated {
                    journal_type: JournalType::Purchase
                },
                ValidationWarning::MissingTaxLine {
                    journal_type: JournalType::Purchase
                },
            ]
        );

        entry.reference = Some("FAC-2025-001".to_string());
        entry.lines[0].tax_code = Some("N16".to_string());
        assert!(validate_entry(&entry).warnings.is_empty());
    }

    #[test]
    fn test_line_warnings() {
        let mut line = JournalLine::debit("411", dec!(50)).with_tax_code("Z99");
        line.due_date = NaiveDate::from_ymd_opt(2025, 1, 1);
        let entry = header(vec![line, JournalLine::credit("701", dec!(50))]);
        let result = validate_entry(&entry);

        assert!(result.is_valid);
        assert_eq!(
            result.warnings,
            vec![
                ValidationWarning::UnknownTaxCode {
                    line: 1,
                    code: "Z99".to_string()
                },
                ValidationWarning::DueDateBeforeEntryDate { line: 1 },
            ]
        );
        assert_eq!(result.warnings[0].warning_code(), "UNKNOWN_TAX_CODE");
        assert_eq!(result.warning_messages()[0], "Line 1: unknown tax code Z99");
    }

    #[test]
    fn test_default_tolerance_value() {
        assert_eq!(DEFAULT_TOLERANCE, dec!(0.01));
    }
}
