//! Journal entry logic.
//!
//! This module implements the entry editor's rules:
//! - Entry and line types with their status lifecycle
//! - The immutable journal type and tax code catalog
//! - Double-entry validation with errors and warnings
//! - Reference generation over an injectable sequence source
//! - Tax and counterpart auto-completion
//! - The service tying them into one pipeline

pub mod autocomplete;
pub mod catalog;
pub mod error;
pub mod reference;
pub mod sequence;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod autocomplete_props;
#[cfg(test)]
mod reference_props;
#[cfg(test)]
mod validation_props;

pub use autocomplete::{AutoCompleteAssistant, AutoCompleteOptions, Completion, CounterpartProposal};
pub use catalog::{AccountRef, Catalog, JournalTypeConfig, TaxCodeConfig};
pub use error::JournalError;
pub use reference::{ParsedReference, REFERENCE_LEN, ReferenceGenerator, parse_reference, validate_reference};
pub use sequence::{FixedSequence, InMemorySequence, MAX_SEQUENCE, SequenceSource};
pub use service::JournalService;
pub use types::{EntryStatus, JournalEntry, JournalLine, JournalType, Side};
pub use validation::{
    DEFAULT_TOLERANCE, EntryValidator, ValidationIssue, ValidationResult, ValidationWarning,
    validate_entry,
};
