//! Catalog listing routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;

use crate::AppState;

/// Creates the catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal-types", get(list_journal_types))
        .route("/tax-codes", get(list_tax_codes))
}

/// GET `/journal-types` - List journal type configurations.
async fn list_journal_types(State(state): State<AppState>) -> impl IntoResponse {
    let journal_types = state.catalog().journal_types();
    (StatusCode::OK, Json(json!({ "journal_types": journal_types })))
}

/// GET `/tax-codes` - List tax codes.
async fn list_tax_codes(State(state): State<AppState>) -> impl IntoResponse {
    let tax_codes = state.catalog().tax_codes();
    (StatusCode::OK, Json(json!({ "tax_codes": tax_codes })))
}
