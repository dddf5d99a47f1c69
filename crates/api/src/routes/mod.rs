//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use grandlivre_core::journal::JournalError;
use grandlivre_shared::AppError;
use serde_json::json;

use crate::AppState;

pub mod catalog;
pub mod entries;
pub mod health;
pub mod references;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(catalog::routes())
        .merge(entries::routes())
        .merge(references::routes())
}

/// Renders `{ "error": code, "message": text }` with the given status.
fn error_body(status: u16, code: &str, message: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": code, "message": message }))).into_response()
}

/// Error response for a failed journal operation.
pub(crate) fn journal_error(err: &JournalError) -> Response {
    error_body(err.http_status_code(), err.error_code(), err.to_string())
}

/// Error response for an application-level error.
pub(crate) fn app_error(err: &AppError) -> Response {
    error_body(err.status_code(), err.error_code(), err.to_string())
}
