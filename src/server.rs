//! HTTP server initialization.
//!
//! Provides the [`serve`] entry point that wires up the database, embedding
//! provider, and API router into a running server.

use crate::api::{self, AppState};
use crate::config::ViewfinderConfig;
use crate::db;
use crate::embedding;
use anyhow::Result;
use std::sync::{Arc, Mutex};

/// Shared setup: open DB, create embedding provider, check model version.
fn setup_shared_state(config: ViewfinderConfig) -> Result<AppState> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    // Check for embedding model mismatch
    if let Ok(Some(stored_model)) = db::migrations::get_embedding_model(&conn) {
        if stored_model != config.embedding.model {
            tracing::warn!(
                stored = %stored_model,
                configured = %config.embedding.model,
                "embedding model changed; existing vectors were built with the stored model"
            );
        }
    }

    let db = Arc::new(Mutex::new(conn));

    let provider = embedding::create_provider(&config.embedding)?;
    let embedding: Arc<dyn embedding::EmbeddingProvider> = Arc::from(provider);
    tracing::info!(
        provider = embedding.name(),
        model = embedding.model_id(),
        dims = embedding.dimensions(),
        "embedding provider ready"
    );

    Ok(AppState::new(db, embedding, Arc::new(config)))
}

/// Start the HTTP server and block until ctrl-c.
pub async fn serve(config: ViewfinderConfig) -> Result<()> {
    let bind_addr = config.server.bind_addr.clone();
    tracing::info!(addr = %bind_addr, "starting viewfinder HTTP server");

    let state = setup_shared_state(config)?;
    let router = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "API listening at http://{bind_addr}/api");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl-c");
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
