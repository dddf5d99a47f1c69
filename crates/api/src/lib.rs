//! HTTP API layer with Axum routes.
//!
//! This crate exposes the journal core over JSON:
//! - Catalog listings (journal types, tax codes)
//! - Entry validation, preparation and auto-completion
//! - Reference generation and parsing

pub mod routes;

use std::sync::Arc;

use axum::Router;
use grandlivre_core::journal::{Catalog, InMemorySequence, JournalService};
use grandlivre_shared::config::JournalConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Journal service as shared by the handlers.
pub type SharedJournalService = JournalService<Arc<InMemorySequence>>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Entry pipeline over the active catalog.
    pub journal: Arc<SharedJournalService>,
    /// Reference counters, shared with `journal`.
    pub sequence: Arc<InMemorySequence>,
}

impl AppState {
    /// Builds the state for `catalog` with the configured journal rules.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, config: &JournalConfig) -> Self {
        let sequence = Arc::new(InMemorySequence::new());
        let journal = JournalService::new(catalog, Arc::clone(&sequence), config.balance_tolerance);
        Self {
            journal: Arc::new(journal),
            sequence,
        }
    }

    /// The catalog used by every handler.
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        self.journal.catalog()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Catalog::builtin(), &JournalConfig::default())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
