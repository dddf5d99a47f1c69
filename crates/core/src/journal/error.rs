//! Journal error types for editing, lifecycle and reference operations.
//!
//! Validation problems found in an entry are *not* errors: they are reported
//! as [`ValidationIssue`](super::validation::ValidationIssue)s inside a
//! validation result. The variants here cover operations that cannot proceed.

use chrono::NaiveDate;
use grandlivre_shared::AppError;
use grandlivre_shared::types::{JournalEntryId, JournalLineId};
use thiserror::Error;

use super::types::{EntryStatus, JournalType};

/// Errors that can occur during journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    // ========== Editing Errors ==========
    /// An entry must always keep at least one line.
    #[error("An entry must keep at least one line")]
    LastLine,

    /// Line not found in the entry.
    #[error("Line not found: {0}")]
    LineNotFound(JournalLineId),

    /// Entry is validated and can no longer change.
    #[error("Entry {0} is validated and can no longer be modified")]
    EntryLocked(JournalEntryId),

    // ========== Lifecycle Errors ==========
    /// Status change not allowed.
    #[error("Cannot move entry from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: EntryStatus,
        /// Requested status.
        to: EntryStatus,
    },

    /// Entry failed validation and cannot be submitted.
    #[error("Entry is not valid ({count} error(s))")]
    EntryInvalid {
        /// Number of validation errors.
        count: usize,
    },

    // ========== Reference Errors ==========
    /// No sequence number left for this journal and day.
    #[error("Reference sequence exhausted for {journal_type} on {date}")]
    SequenceExhausted {
        /// Journal type.
        journal_type: JournalType,
        /// Accounting date.
        date: NaiveDate,
    },

    /// A reference needs a journal type and a date with a four-digit year.
    #[error("A reference needs a journal type and a date between years 0000 and 9999")]
    ReferenceUnderivable,

    // ========== Catalog Errors ==========
    /// Unknown journal type code.
    #[error("Unknown journal type: {0}")]
    UnknownJournalType(String),

    /// Unknown tax code.
    #[error("Unknown tax code: {0}")]
    UnknownTaxCode(String),

    /// Catalog tables are inconsistent.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LastLine => "LAST_LINE",
            Self::LineNotFound(_) => "LINE_NOT_FOUND",
            Self::EntryLocked(_) => "ENTRY_LOCKED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::EntryInvalid { .. } => "ENTRY_INVALID",
            Self::SequenceExhausted { .. } => "SEQUENCE_EXHAUSTED",
            Self::ReferenceUnderivable => "REFERENCE_UNDERIVABLE",
            Self::UnknownJournalType(_) => "UNKNOWN_JOURNAL_TYPE",
            Self::UnknownTaxCode(_) => "UNKNOWN_TAX_CODE",
            Self::InvalidCatalog(_) => "INVALID_CATALOG",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - caller sent something unusable
            Self::UnknownJournalType(_) | Self::UnknownTaxCode(_) | Self::ReferenceUnderivable => {
                400
            }

            // 404 Not Found
            Self::LineNotFound(_) => 404,

            // 409 Conflict
            Self::EntryLocked(_) | Self::InvalidTransition { .. } | Self::SequenceExhausted { .. } => {
                409
            }

            // 422 Unprocessable - bookkeeping rules
            Self::LastLine | Self::EntryInvalid { .. } => 422,

            // 500 Internal Server Error
            Self::InvalidCatalog(_) => 500,
        }
    }
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            400 => Self::BadRequest(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            422 => Self::BusinessRule(message),
            _ => Self::Internal(message),
        }
    }
}
