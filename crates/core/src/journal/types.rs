//! Journal entry domain types.
//!
//! A [`JournalEntry`] owns an ordered list of [`JournalLine`]s. Header fields
//! and line amounts are optional so that a draft being edited can be held and
//! validated as-is; the validator reports what is missing instead of
//! defaulting it.

use chrono::NaiveDate;
use grandlivre_shared::types::{JournalEntryId, JournalLineId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::JournalError;

/// Accounting journal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JournalType {
    /// Bank journal (relevés bancaires).
    Bank,
    /// Purchase journal (factures fournisseurs).
    Purchase,
    /// Sales journal (factures clients).
    Sales,
    /// Cash journal (caisse).
    Cash,
    /// General journal (opérations diverses).
    General,
}

impl JournalType {
    /// Every journal type, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Bank,
        Self::Purchase,
        Self::Sales,
        Self::Cash,
        Self::General,
    ];

    /// Returns the wire code (`"BANK"`, `"PURCHASE"`, ...).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Bank => "BANK",
            Self::Purchase => "PURCHASE",
            Self::Sales => "SALES",
            Self::Cash => "CASH",
            Self::General => "GENERAL",
        }
    }

    /// Position of this type in [`JournalType::ALL`].
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for JournalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for JournalType {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| JournalError::UnknownJournalType(s.to_string()))
    }
}

/// Side of a double-entry line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Debit side.
    Debit,
    /// Credit side.
    Credit,
}

impl Side {
    /// Returns the other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// Entry status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Being edited (brouillon).
    #[default]
    Draft,
    /// Submitted for review.
    Pending,
    /// Validated and immutable.
    Validated,
}

impl EntryStatus {
    /// Returns true if header and lines may still change.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        !matches!(self, Self::Validated)
    }

    /// Returns true if `next` is a legal successor of this status.
    ///
    /// `draft -> pending`, `pending -> draft`, `draft | pending -> validated`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Pending)
                | (Self::Pending, Self::Draft)
                | (Self::Draft | Self::Pending, Self::Validated)
        )
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Validated => "validated",
        })
    }
}

/// A single line of a journal entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalLine {
    /// Line identifier.
    pub id: JournalLineId,
    /// Account number (e.g. `"401"`).
    pub account_code: Option<String>,
    /// Account label, for display.
    pub account_name: Option<String>,
    /// Debit amount.
    pub debit: Option<Decimal>,
    /// Credit amount.
    pub credit: Option<Decimal>,
    /// Free-text line label.
    pub description: Option<String>,
    /// Analytical (cost centre) code.
    pub analytical_code: Option<String>,
    /// Tax code applied to this line.
    pub tax_code: Option<String>,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
}

impl JournalLine {
    /// Creates an empty line, as added by "new line" in the editor.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a debit line on `account_code`.
    #[must_use]
    pub fn debit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: Some(account_code.into()),
            debit: Some(amount),
            ..Self::default()
        }
    }

    /// Creates a credit line on `account_code`.
    #[must_use]
    pub fn credit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: Some(account_code.into()),
            credit: Some(amount),
            ..Self::default()
        }
    }

    /// Creates a line of `amount` on the given side.
    #[must_use]
    pub fn on_side(side: Side, account_code: impl Into<String>, amount: Decimal) -> Self {
        match side {
            Side::Debit => Self::debit(account_code, amount),
            Side::Credit => Self::credit(account_code, amount),
        }
    }

    /// Sets the line label.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the account label.
    #[must_use]
    pub fn with_account_name(mut self, name: impl Into<String>) -> Self {
        self.account_name = Some(name.into());
        self
    }

    /// Sets the tax code.
    #[must_use]
    pub fn with_tax_code(mut self, code: impl Into<String>) -> Self {
        self.tax_code = Some(code.into());
        self
    }

    /// Debit amount, absent counting as zero.
    #[must_use]
    pub fn debit_amount(&self) -> Decimal {
        self.debit.unwrap_or(Decimal::ZERO)
    }

    /// Credit amount, absent counting as zero.
    #[must_use]
    pub fn credit_amount(&self) -> Decimal {
        self.credit.unwrap_or(Decimal::ZERO)
    }

    /// Returns the account code if it is set and not blank.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        self.account_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    /// Returns the populated side and its amount.
    ///
    /// A positive debit wins over a credit; `None` when neither side is
    /// positive.
    #[must_use]
    pub fn posted_side(&self) -> Option<(Side, Decimal)> {
        let debit = self.debit_amount();
        let credit = self.credit_amount();
        if debit > Decimal::ZERO {
            Some((Side::Debit, debit))
        } else if credit > Decimal::ZERO {
            Some((Side::Credit, credit))
        } else {
            None
        }
    }
}

/// A journal entry: header plus its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalEntry {
    /// Entry identifier.
    pub id: JournalEntryId,
    /// Accounting date.
    pub date: Option<NaiveDate>,
    /// Journal the entry is posted to.
    pub journal_type: Option<JournalType>,
    /// Reference code (piece number).
    pub reference: Option<String>,
    /// Entry label.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// Ordered lines.
    pub lines: Vec<JournalLine>,
}

impl Default for JournalEntry {
    fn default() -> Self {
        Self {
            id: JournalEntryId::new(),
            date: None,
            journal_type: None,
            reference: None,
            description: None,
            status: EntryStatus::Draft,
            lines: Vec::new(),
        }
    }
}

fn checked_sum(mut amounts: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    amounts.try_fold(Decimal::ZERO, Decimal::checked_add)
}

impl JournalEntry {
    /// Creates a new draft holding a single empty line.
    #[must_use]
    pub fn new_draft() -> Self {
        Self {
            lines: vec![JournalLine::empty()],
            ..Self::default()
        }
    }

    /// Sum of all debit amounts, or `None` if it does not fit in a `Decimal`.
    #[must_use]
    pub fn total_debit(&self) -> Option<Decimal> {
        checked_sum(self.lines.iter().map(JournalLine::debit_amount))
    }

    /// Sum of all credit amounts, or `None` if it does not fit in a `Decimal`.
    #[must_use]
    pub fn total_credit(&self) -> Option<Decimal> {
        checked_sum(self.lines.iter().map(JournalLine::credit_amount))
    }

    /// Returns true if the reference is set and not blank.
    #[must_use]
    pub fn has_reference(&self) -> bool {
        self.reference
            .as_deref()
            .is_some_and(|reference| !reference.trim().is_empty())
    }

    /// Appends a line and returns its id.
    pub fn add_line(&mut self, line: JournalLine) -> Result<JournalLineId, JournalError> {
        self.ensure_editable()?;
        let id = line.id;
        self.lines.push(line);
        Ok(id)
    }

    /// Mutates the line with `id` in place.
    pub fn update_line<F>(&mut self, id: JournalLineId, edit: F) -> Result<(), JournalError>
    where
        F: FnOnce(&mut JournalLine),
    {
        self.ensure_editable()?;
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.id == id)
            .ok_or(JournalError::LineNotFound(id))?;
        edit(line);
        Ok(())
    }

    /// Removes the line with `id`. The last remaining line cannot be removed.
    pub fn remove_line(&mut self, id: JournalLineId) -> Result<JournalLine, JournalError> {
        self.ensure_editable()?;
        let position = self
            .lines
            .iter()
            .position(|line| line.id == id)
            .ok_or(JournalError::LineNotFound(id))?;
        if self.lines.len() == 1 {
            return Err(JournalError::LastLine);
        }
        Ok(self.lines.remove(position))
    }

    /// Replaces every line at once (used when accepting an auto-completion).
    pub fn replace_lines(&mut self, lines: Vec<JournalLine>) -> Result<(), JournalError> {
        self.ensure_editable()?;
        if lines.is_empty() {
            return Err(JournalError::LastLine);
        }
        self.lines = lines;
        Ok(())
    }

    /// Fails with [`JournalError::EntryLocked`] once the entry is validated.
    pub fn ensure_editable(&self) -> Result<(), JournalError> {
        if self.status.is_editable() {
            Ok(())
        } else {
            Err(JournalError::EntryLocked(self.id))
        }
    }
}
