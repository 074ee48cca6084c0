//! Serve command - Starts the HTTP server.

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, DocumentStore};
use crate::jobs;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let db = Database::connect(&config).await?;

    let documents = match &config.mongodb_url {
        Some(url) => Some(DocumentStore::connect(url).await?),
        None => None,
    };

    // The expiry sweep runs for as long as the server does.
    let _scheduler = jobs::start_scheduler(db.get_connection()).await?;

    let state = AppState::new(db.get_connection(), documents);
    let app = create_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}
