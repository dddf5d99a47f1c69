//! Journal entry routes: validation, preparation and auto-completion.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use grandlivre_core::journal::{
    AutoCompleteOptions, CounterpartProposal, JournalEntry, JournalError, JournalLine,
    JournalType, ValidationResult,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::journal_error;
use crate::AppState;

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal-entries/validate", post(validate_entry))
        .route("/journal-entries/prepare", post(prepare_entry))
        .route("/journal-entries/autocomplete", post(autocomplete_entry))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// A blocking validation problem.
#[derive(Debug, Serialize)]
pub struct IssueResponse {
    /// Machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// 1-based line number, for line-level issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

/// An advisory finding.
#[derive(Debug, Serialize)]
pub struct WarningResponse {
    /// Machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Validation outcome.
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    /// True when no error was found.
    pub is_valid: bool,
    /// Blocking problems, in detection order.
    pub errors: Vec<IssueResponse>,
    /// Advisory findings.
    pub warnings: Vec<WarningResponse>,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// `total_debit - total_credit`, null when it cannot be represented.
    pub difference: Option<Decimal>,
    /// True when the totals agree within the tolerance.
    pub is_balanced: bool,
}

impl From<&ValidationResult> for ValidationResponse {
    fn from(result: &ValidationResult) -> Self {
        Self {
            is_valid: result.is_valid,
            errors: result
                .errors
                .iter()
                .map(|issue| IssueResponse {
                    code: issue.error_code(),
                    message: issue.to_string(),
                    line: issue.line(),
                })
                .collect(),
            warnings: result
                .warnings
                .iter()
                .map(|warning| WarningResponse {
                    code: warning.warning_code(),
                    message: warning.to_string(),
                })
                .collect(),
            total_debit: result.total_debit,
            total_credit: result.total_credit,
            difference: result.difference(),
            is_balanced: result.is_balanced,
        }
    }
}

/// Response for a prepared entry.
#[derive(Debug, Serialize)]
pub struct PrepareResponse {
    /// The entry, with its reference assigned when it was valid.
    pub entry: JournalEntry,
    /// Validation outcome.
    pub validation: ValidationResponse,
}

/// Request body for auto-completion.
#[derive(Debug, Deserialize)]
pub struct AutoCompleteRequest {
    /// Journal type code (e.g. `PURCHASE`).
    pub journal_type: String,
    /// The main line typed by the user.
    pub line: JournalLine,
    /// Tax code to apply.
    #[serde(default)]
    pub tax_code: Option<String>,
    /// Counterpart account chosen by the user.
    #[serde(default)]
    pub counterpart_account: Option<String>,
}

/// Response for auto-completion.
#[derive(Debug, Serialize)]
pub struct AutoCompleteResponse {
    /// Proposed lines, main line first.
    pub lines: Vec<JournalLine>,
    /// Counterpart decision, when a counterpart line was generated.
    pub counterpart: Option<CounterpartProposal>,
    /// True while the counterpart account is an unconfirmed guess.
    pub requires_confirmation: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST `/journal-entries/validate` - Validate an entry.
async fn validate_entry(
    State(state): State<AppState>,
    Json(entry): Json<JournalEntry>,
) -> impl IntoResponse {
    let result = state.journal.validate(&entry);
    debug!(
        entry_id = %entry.id,
        is_valid = result.is_valid,
        errors = result.errors.len(),
        "Validated journal entry"
    );
    (StatusCode::OK, Json(ValidationResponse::from(&result)))
}

/// POST `/journal-entries/prepare` - Validate, then assign a missing reference.
async fn prepare_entry(
    State(state): State<AppState>,
    Json(mut entry): Json<JournalEntry>,
) -> Response {
    match state.journal.prepare(&mut entry) {
        Ok(result) => {
            if result.is_valid {
                info!(
                    entry_id = %entry.id,
                    reference = entry.reference.as_deref().unwrap_or_default(),
                    "Prepared journal entry"
                );
            }
            let response = PrepareResponse {
                validation: ValidationResponse::from(&result),
                entry,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => journal_error(&e),
    }
}

/// POST `/journal-entries/autocomplete` - Propose tax and counterpart lines.
async fn autocomplete_entry(
    State(state): State<AppState>,
    Json(payload): Json<AutoCompleteRequest>,
) -> Response {
    let journal_type = match payload.journal_type.parse::<JournalType>() {
        Ok(journal_type) => journal_type,
        Err(e) => return journal_error(&e),
    };

    if let Some(code) = payload.tax_code.as_deref()
        && state.catalog().tax_code(code).is_none()
    {
        return journal_error(&JournalError::UnknownTaxCode(code.to_string()));
    }

    let options = AutoCompleteOptions {
        journal_type,
        tax_code: payload.tax_code,
        counterpart_account: payload.counterpart_account,
    };
    let completion = state.journal.autocomplete(&payload.line, &options);
    let response = AutoCompleteResponse {
        requires_confirmation: completion.requires_confirmation(),
        counterpart: completion.counterpart,
        lines: completion.lines,
    };
    (StatusCode::OK, Json(response)).into_response()
}
