//! Sequence sources for reference numbers.
//!
//! A reference ends with a three-digit number that must be unique per
//! journal type and day. [`SequenceSource`] abstracts where that number comes
//! from so callers can plug in a persistent counter.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;

use super::error::JournalError;
use super::types::JournalType;

/// Highest sequence number a reference can carry.
pub const MAX_SEQUENCE: u16 = 999;

/// Provides the next sequence number for a journal type and day.
pub trait SequenceSource: Send + Sync {
    /// Returns the next number in `1..=MAX_SEQUENCE`.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::SequenceExhausted`] when no number is left.
    fn next(&self, journal_type: JournalType, date: NaiveDate) -> Result<u16, JournalError>;
}

impl<S: SequenceSource + ?Sized> SequenceSource for Arc<S> {
    fn next(&self, journal_type: JournalType, date: NaiveDate) -> Result<u16, JournalError> {
        (**self).next(journal_type, date)
    }
}

impl<S: SequenceSource + ?Sized> SequenceSource for &S {
    fn next(&self, journal_type: JournalType, date: NaiveDate) -> Result<u16, JournalError> {
        (**self).next(journal_type, date)
    }
}

/// Monotonic counter per (journal type, day), held in memory.
///
/// Seed it with the last number already persisted for a day so that a
/// restarted process does not hand out the same reference twice.
#[derive(Debug, Default)]
pub struct InMemorySequence {
    counters: DashMap<(JournalType, NaiveDate), u16>,
}

impl InMemorySequence {
    /// Creates an empty counter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `last_used` as the highest number taken for the key.
    ///
    /// Never moves a counter backwards.
    pub fn seed(&self, journal_type: JournalType, date: NaiveDate, last_used: u16) {
        let mut counter = self.counters.entry((journal_type, date)).or_insert(0);
        *counter = (*counter).max(last_used.min(MAX_SEQUENCE));
    }

    /// Last number handed out for the key (0 if none).
    #[must_use]
    pub fn current(&self, journal_type: JournalType, date: NaiveDate) -> u16 {
        self.counters
            .get(&(journal_type, date))
            .map_or(0, |counter| *counter)
    }
}

impl SequenceSource for InMemorySequence {
    fn next(&self, journal_type: JournalType, date: NaiveDate) -> Result<u16, JournalError> {
        // The entry guard holds the shard lock, so increments are atomic per key.
        let mut counter = self.counters.entry((journal_type, date)).or_insert(0);
        if *counter >= MAX_SEQUENCE {
            return Err(JournalError::SequenceExhausted { journal_type, date });
        }
        *counter += 1;
        Ok(*counter)
    }
}

/// Always yields the same number. Useful for previews and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedSequence(pub u16);

impl SequenceSource for FixedSequence {
    fn next(&self, journal_type: JournalType, date: NaiveDate) -> Result<u16, JournalError> {
        if (1..=MAX_SEQUENCE).contains(&self.0) {
            Ok(self.0)
        } else {
            Err(JournalError::SequenceExhausted { journal_type, date })
        }
    }
}
