//! Operational endpoints: health, categories, library statistics.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::api::error::ApiResult;
use crate::api::AppState;
use crate::catalog::stats::{categories as category_counts, library_stats, CategoryCount};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub database: String,
    pub embedding: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_photos: u64,
    /// Number of distinct categories in use.
    pub categories: usize,
    pub category_distribution: BTreeMap<String, u64>,
    pub total_uploads: u64,
    pub total_searches: u64,
    pub total_clicks: u64,
    pub db_size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_photo: Option<String>,
}

/// GET /api/health - Liveness plus a database ping.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state
        .with_db(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map_err(Into::into)
        })
        .await
    {
        Ok(_) => "connected".to_string(),
        Err(err) => format!("error: {err}"),
    };

    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
        database,
        embedding: state.embedding.name(),
    })
}

/// GET /api/categories - Categories in use with photo counts,
/// most-populated first.
pub async fn categories(State(state): State<AppState>) -> ApiResult<Json<Vec<CategoryCount>>> {
    let cats = state.with_db(|conn| category_counts(conn)).await?;
    Ok(Json(cats))
}

/// GET /api/stats - Library statistics.
pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let db_path = state.config.resolved_db_path();
    let stats = state
        .with_db(move |conn| library_stats(conn, Some(&db_path)))
        .await?;

    let category_distribution: BTreeMap<String, u64> = stats
        .by_category
        .iter()
        .map(|c| (c.name.clone(), c.count))
        .collect();

    Ok(Json(StatsResponse {
        total_photos: stats.total_photos,
        categories: stats.by_category.len(),
        category_distribution,
        total_uploads: stats.total_uploads,
        total_searches: stats.total_searches,
        total_clicks: stats.total_clicks,
        db_size_bytes: stats.db_size_bytes,
        oldest_photo: stats.oldest_photo,
        newest_photo: stats.newest_photo,
    }))
}
