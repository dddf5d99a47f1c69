//! Journal service: the entry pipeline and status lifecycle.
//!
//! Ties the validator, the reference generator and the auto-complete assistant
//! to one catalog. Entries are mutated in place; persistence is the caller's
//! concern.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::autocomplete::{AutoCompleteAssistant, AutoCompleteOptions, Completion};
use super::catalog::Catalog;
use super::error::JournalError;
use super::reference::{ParsedReference, ReferenceGenerator};
use super::sequence::{InMemorySequence, SequenceSource};
use super::types::{EntryStatus, JournalEntry, JournalLine, JournalType};
use super::validation::{EntryValidator, ValidationResult};

/// Entry pipeline over a single catalog and sequence source.
#[derive(Debug)]
pub struct JournalService<S = InMemorySequence> {
    catalog: Arc<Catalog>,
    validator: EntryValidator,
    references: ReferenceGenerator<S>,
    assistant: AutoCompleteAssistant,
}

impl<S: SequenceSource> JournalService<S> {
    /// Creates a service validating with `tolerance` and numbering references
    /// from `sequence`.
    pub fn new(catalog: Arc<Catalog>, sequence: S, tolerance: Decimal) -> Self {
        Self {
            validator: EntryValidator::new(Arc::clone(&catalog)).with_tolerance(tolerance),
            references: ReferenceGenerator::new(Arc::clone(&catalog), sequence),
            assistant: AutoCompleteAssistant::new(Arc::clone(&catalog)),
            catalog,
        }
    }

    /// The catalog every component reads.
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Validates `entry` without changing it.
    #[must_use]
    pub fn validate(&self, entry: &JournalEntry) -> ValidationResult {
        self.validator.validate(entry)
    }

    /// Proposes tax and counterpart lines around `main`.
    #[must_use]
    pub fn autocomplete(&self, main: &JournalLine, options: &AutoCompleteOptions) -> Completion {
        self.assistant.complete(main, options)
    }

    /// Generates a reference for `journal_type` on `date`.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::SequenceExhausted` or
    /// `JournalError::ReferenceUnderivable`.
    pub fn generate_reference(
        &self,
        journal_type: JournalType,
        date: NaiveDate,
    ) -> Result<String, JournalError> {
        self.references.generate(journal_type, date)
    }

    /// Parses `reference` against the catalog.
    #[must_use]
    pub fn parse_reference(&self, reference: &str) -> Option<ParsedReference> {
        self.references.parse(reference)
    }

    /// Validates `entry` and, when it is valid and has no reference, assigns
    /// one. The status is left untouched. The returned result describes the
    /// entry as it stands after the assignment.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::EntryLocked` for a validated entry, or the
    /// reference generator's error.
    pub fn prepare(&self, entry: &mut JournalEntry) -> Result<ValidationResult, JournalError> {
        entry.ensure_editable()?;
        let result = self.validate(entry);
        if result.is_valid && !entry.has_reference() {
            self.assign_reference(entry)?;
            return Ok(self.validate(entry));
        }
        Ok(result)
    }

    /// Saves `entry` as a draft, reopening it if it was pending.
    ///
    /// Drafts may be invalid; the validation result is returned for display.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::InvalidTransition` for a validated entry.
    pub fn save_draft(&self, entry: &mut JournalEntry) -> Result<ValidationResult, JournalError> {
        if entry.status != EntryStatus::Draft {
            Self::transition(entry, EntryStatus::Draft)?;
        }
        Ok(self.validate(entry))
    }

    /// Moves a valid draft to `pending`.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::InvalidTransition` unless the entry is a draft,
    /// or `JournalError::EntryInvalid` if validation fails.
    pub fn submit_for_review(
        &self,
        entry: &mut JournalEntry,
    ) -> Result<ValidationResult, JournalError> {
        Self::check_transition(entry, EntryStatus::Pending)?;
        let result = self.require_valid(entry)?;
        Self::transition(entry, EntryStatus::Pending)?;
        Ok(result)
    }

    /// Validates `entry` for good: assigns a reference when missing and moves
    /// it to `validated`, after which it can no longer change.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::InvalidTransition` for an entry already
    /// validated, `JournalError::EntryInvalid` if validation fails, or the
    /// reference generator's error. The entry is unchanged on error.
    pub fn finalize(&self, entry: &mut JournalEntry) -> Result<ValidationResult, JournalError> {
        Self::check_transition(entry, EntryStatus::Validated)?;
        let result = self.require_valid(entry)?;
        if !entry.has_reference() {
            self.assign_reference(entry)?;
        }
        Self::transition(entry, EntryStatus::Validated)?;
        tracing::info!(
            entry_id = %entry.id,
            reference = entry.reference.as_deref().unwrap_or_default(),
            "Journal entry validated"
        );
        Ok(result)
    }

    /// Sends a pending entry back to draft.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::InvalidTransition` unless the entry is pending.
    pub fn reopen(&self, entry: &mut JournalEntry) -> Result<(), JournalError> {
        if entry.status != EntryStatus::Pending {
            return Err(JournalError::InvalidTransition {
                from: entry.status,
                to: EntryStatus::Draft,
            });
        }
        Self::transition(entry, EntryStatus::Draft)
    }

    fn require_valid(&self, entry: &JournalEntry) -> Result<ValidationResult, JournalError> {
        let result = self.validate(entry);
        if result.is_valid {
            Ok(result)
        } else {
            tracing::warn!(
                entry_id = %entry.id,
                errors = result.errors.len(),
                "Rejected invalid journal entry"
            );
            Err(JournalError::EntryInvalid {
                count: result.errors.len(),
            })
        }
    }

    fn assign_reference(&self, entry: &mut JournalEntry) -> Result<(), JournalError> {
        let (Some(journal_type), Some(date)) = (entry.journal_type, entry.date) else {
            return Err(JournalError::ReferenceUnderivable);
        };
        entry.reference = Some(self.references.generate(journal_type, date)?);
        Ok(())
    }

    fn check_transition(entry: &JournalEntry, to: EntryStatus) -> Result<(), JournalError> {
        if entry.status.can_transition_to(to) {
            Ok(())
        } else {
            Err(JournalError::InvalidTransition {
                from: entry.status,
                to,
            })
        }
    }

    fn transition(entry: &mut JournalEntry, to: EntryStatus) -> Result<(), JournalError> {
        Self::check_transition(entry, to)?;
        tracing::debug!(entry_id = %entry.id, from = %entry.status, %to, "Entry status changed");
        entry.status = to;
        Ok(())
    }
}
