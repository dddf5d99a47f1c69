//! Grand Livre API Server
//!
//! Main entry point for the journal entry service.

use grandlivre_core::journal::Catalog;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use grandlivre_api::{AppState, create_router};
use grandlivre_shared::AppConfig;
use grandlivre_shared::config::LoggingConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    init_tracing(&config.logging);

    // Create application state
    let catalog = Catalog::builtin();
    info!(
        journal_types = catalog.journal_types().len(),
        tax_codes = catalog.tax_codes().len(),
        balance_tolerance = %config.journal.balance_tolerance,
        "Journal catalog loaded"
    );
    let state = AppState::new(catalog, &config.journal);

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(logging.json.then(|| fmt::layer().json()))
        .with((!logging.json).then(fmt::layer))
        .init();
}
