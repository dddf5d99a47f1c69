//! Reference routes: generation and parsing.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use grandlivre_core::journal::JournalType;
use grandlivre_shared::AppError;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{app_error, journal_error};
use crate::AppState;

/// Creates the reference routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/references", post(generate_reference))
        .route("/references/{reference}", get(parse_reference))
}

/// Request body for generating a reference.
#[derive(Debug, Deserialize)]
pub struct GenerateReferenceRequest {
    /// Journal type code (e.g. `BANK`).
    pub journal_type: String,
    /// Accounting date (YYYY-MM-DD).
    pub date: NaiveDate,
}

/// Response for a generated reference.
#[derive(Debug, Serialize)]
pub struct ReferenceResponse {
    /// The reference code.
    pub reference: String,
}

/// POST `/references` - Generate the next reference for a journal and day.
async fn generate_reference(
    State(state): State<AppState>,
    Json(payload): Json<GenerateReferenceRequest>,
) -> Response {
    let journal_type = match payload.journal_type.parse::<JournalType>() {
        Ok(journal_type) => journal_type,
        Err(e) => return journal_error(&e),
    };

    match state.journal.generate_reference(journal_type, payload.date) {
        Ok(reference) => {
            info!(%journal_type, date = %payload.date, %reference, "Reference issued");
            (StatusCode::CREATED, Json(ReferenceResponse { reference })).into_response()
        }
        Err(e) => journal_error(&e),
    }
}

/// GET `/references/{reference}` - Decompose a reference.
async fn parse_reference(State(state): State<AppState>, Path(reference): Path<String>) -> Response {
    match state.journal.parse_reference(&reference) {
        Some(parsed) => (StatusCode::OK, Json(parsed)).into_response(),
        None => app_error(&AppError::NotFound(format!("reference {reference}"))),
    }
}
