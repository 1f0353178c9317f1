//! HTTP API surface: router, shared state, and request plumbing.
//!
//! Handlers live in [`search`], [`photos`], and [`meta`]; they validate
//! input, call the embedding provider, and run catalog operations on the
//! blocking pool via [`AppState::with_db`].

pub mod error;
pub mod meta;
pub mod photos;
pub mod search;
pub mod types;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::catalog::types::normalize_category;
use crate::config::ViewfinderConfig;
use crate::embedding::EmbeddingProvider;
use error::{ApiError, ApiResult};

/// Uploads carry whole image files as multipart bodies.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Shared application state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub embedding: Arc<dyn EmbeddingProvider>,
    pub config: Arc<ViewfinderConfig>,
}

impl AppState {
    pub fn new(
        db: Arc<Mutex<Connection>>,
        embedding: Arc<dyn EmbeddingProvider>,
        config: Arc<ViewfinderConfig>,
    ) -> Self {
        Self {
            db,
            embedding,
            config,
        }
    }

    /// Run a closure against the database on the blocking pool
    /// (sync rusqlite work must stay off the async runtime).
    pub(crate) async fn with_db<T, F>(&self, f: F) -> ApiResult<T>
    where
        F: FnOnce(&mut Connection) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let mut conn = db
                .lock()
                .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("db task failed: {e}")))?
        .map_err(ApiError::Internal)
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(meta::health))
        .route("/api/categories", get(meta::categories))
        .route("/api/stats", get(meta::stats))
        .route(
            "/api/photos",
            get(photos::list_photos).post(photos::upload_photos),
        )
        .route("/api/photos/{id}", get(photos::get_photo))
        .route("/api/photos/{id}/click", post(photos::click_photo))
        .route("/api/search/text", post(search::search_text))
        .route("/api/search/image", post(search::search_image))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Resolve a client-supplied result limit against configured bounds.
fn resolve_limit(requested: Option<usize>, config: &ViewfinderConfig) -> ApiResult<usize> {
    match requested {
        None => Ok(config.search.default_limit),
        Some(0) => Err(ApiError::BadRequest("Limit must be at least 1".into())),
        Some(n) => Ok(n.min(config.search.max_limit)),
    }
}

/// Turn a client-supplied category into a filter. Blank and `all` mean
/// no filter; anything else must be a valid category name.
fn category_filter(raw: Option<&str>) -> ApiResult<Option<String>> {
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => normalize_category(Some(s))
            .map(Some)
            .map_err(ApiError::BadRequest),
    }
}
