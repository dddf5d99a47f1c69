//! Entry reference codes.
//!
//! Format: `{PREFIX}{YYYY}{MM}{DD}-{SEQ}`, e.g. `ACH20250115-007`, where the
//! prefix identifies the journal type and `SEQ` is a three-digit number from
//! a [`SequenceSource`].

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::catalog::Catalog;
use super::error::JournalError;
use super::sequence::{InMemorySequence, SequenceSource};
use super::types::JournalType;

/// Length of a well-formed reference.
pub const REFERENCE_LEN: usize = 15;

/// Components of a parsed reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParsedReference {
    /// Journal type resolved from the prefix.
    pub journal_type: JournalType,
    /// Accounting date.
    pub date: NaiveDate,
    /// Sequence number within the day.
    pub sequence: u16,
}

/// Returns true if `reference` has the shape `AAA99999999-999`.
///
/// Only the shape is checked; the prefix and date may still be unknown or
/// impossible.
#[must_use]
pub fn validate_reference(reference: &str) -> bool {
    let bytes = reference.as_bytes();
    bytes.len() == REFERENCE_LEN
        && bytes[..3].iter().all(u8::is_ascii_uppercase)
        && bytes[3..11].iter().all(u8::is_ascii_digit)
        && bytes[11] == b'-'
        && bytes[12..].iter().all(u8::is_ascii_digit)
}

/// Decomposes `reference` using `catalog` to resolve the prefix.
///
/// Returns `None` for malformed input, an unknown prefix, an impossible
/// calendar date or sequence `000`.
#[must_use]
pub fn parse_reference(catalog: &Catalog, reference: &str) -> Option<ParsedReference> {
    if !validate_reference(reference) {
        return None;
    }

    let journal_type = catalog.by_prefix(&reference[..3])?.journal_type;
    let year: i32 = reference[3..7].parse().ok()?;
    let month: u32 = reference[7..9].parse().ok()?;
    let day: u32 = reference[9..11].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let sequence: u16 = reference[12..].parse().ok()?;
    if sequence == 0 {
        return None;
    }

    Some(ParsedReference {
        journal_type,
        date,
        sequence,
    })
}

/// Builds references from journal type, date and a sequence source.
#[derive(Debug)]
pub struct ReferenceGenerator<S = InMemorySequence> {
    catalog: Arc<Catalog>,
    sequence: S,
}

impl<S: SequenceSource> ReferenceGenerator<S> {
    /// Creates a generator drawing numbers from `sequence`.
    pub fn new(catalog: Arc<Catalog>, sequence: S) -> Self {
        Self { catalog, sequence }
    }

    /// Generates the next reference for `journal_type` on `date`.
    ///
    /// Dates outside years 0000-9999 cannot be encoded and are rejected
    /// before a sequence number is consumed.
    pub fn generate(&self, journal_type: JournalType, date: NaiveDate) -> Result<String, JournalError> {
        if !(0..=9999).contains(&date.year()) {
            return Err(JournalError::ReferenceUnderivable);
        }
        let sequence = self.sequence.next(journal_type, date)?;
        let prefix = &self.catalog.journal_type(journal_type).reference_prefix;
        let reference = format!(
            "{prefix}{:04}{:02}{:02}-{sequence:03}",
            date.year(),
            date.month(),
            date.day()
        );
        tracing::debug!(%journal_type, %date, %reference, "Generated entry reference");
        Ok(reference)
    }

    /// Parses a reference against this generator's catalog.
    #[must_use]
    pub fn parse(&self, reference: &str) -> Option<ParsedReference> {
        parse_reference(&self.catalog, reference)
    }

    /// The sequence source in use.
    pub fn sequence(&self) -> &S {
        &self.sequence
    }
}
