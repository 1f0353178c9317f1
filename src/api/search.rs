//! Text and reference-image search endpoints.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::types::PhotoDto;
use crate::api::{category_filter, resolve_limit, AppState};
use crate::catalog::search::{search_photos, PhotoMatch, SearchFilter, SearchOptions};
use crate::catalog::types::EmbeddingKind;
use crate::embedding::InputType;
use crate::imaging;

#[derive(Debug, Deserialize)]
pub struct TextSearchRequest {
    pub query: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<PhotoDto>,
    pub metadata: SearchMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMeta {
    pub total_results: usize,
    pub limit: usize,
}

/// POST /api/search/text - Search the catalog with a natural language query.
pub async fn search_text(
    State(state): State<AppState>,
    Json(req): Json<TextSearchRequest>,
) -> ApiResult<Json<SearchResponse>> {
    // 1. Validate inputs
    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Query is required".into()));
    }
    let limit = resolve_limit(req.limit, &state.config)?;
    let category = category_filter(req.category.as_deref())?;

    tracing::info!(query_len = query.len(), limit, "text search");

    // 2. Embed the query
    let embedding = state
        .embedding
        .embed_text(&query, InputType::Query)
        .await
        .map_err(ApiError::Upstream)?;

    // 3. KNN + hydration on the blocking pool
    let matches = run_search(
        &state,
        embedding,
        EmbeddingKind::Text,
        query.clone(),
        category,
        limit,
    )
    .await?;

    Ok(Json(build_response(query, matches, limit)))
}

/// POST /api/search/image - Search the catalog with a reference image.
///
/// Multipart fields: `image` (required file), `description` (optional
/// caption folded into the embedding), `limit`, `category`.
pub async fn search_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<SearchResponse>> {
    // 1. Pull fields out of the multipart body
    let mut image: Option<(String, axum::body::Bytes)> = None;
    let mut description = String::new();
    let mut limit: Option<usize> = None;
    let mut category: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                image = Some((filename, field.bytes().await?));
            }
            "description" => description = field.text().await?,
            "limit" => {
                let text = field.text().await?;
                limit = Some(text.trim().parse().map_err(|_| {
                    ApiError::BadRequest("Limit must be a positive integer".into())
                })?);
            }
            "category" => category = Some(field.text().await?),
            _ => {}
        }
    }

    let (filename, bytes) =
        image.ok_or_else(|| ApiError::BadRequest("No image file provided".into()))?;
    if filename.is_empty() {
        return Err(ApiError::BadRequest("No image file selected".into()));
    }
    let limit = resolve_limit(limit, &state.config)?;
    let category = category_filter(category.as_deref())?;
    let description = description.trim().to_string();

    tracing::info!(
        bytes = bytes.len(),
        description_len = description.len(),
        "image search"
    );

    // 2. Decode and normalize the reference image off the async runtime
    let processed = tokio::task::spawn_blocking(move || imaging::process_image(&bytes))
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("imaging task failed: {e}")))?
        .map_err(|e| ApiError::BadRequest(format!("Invalid image file: {e}")))?;

    // 3. Embed it, with the caption folded in when present
    let caption = (!description.is_empty()).then_some(description.as_str());
    let embedding = state
        .embedding
        .embed_image(&processed.image_uri, caption, InputType::Query)
        .await
        .map_err(ApiError::Upstream)?;

    // 4. KNN + hydration
    let query_label = if description.is_empty() {
        "Image search".to_string()
    } else {
        description
    };
    let matches = run_search(
        &state,
        embedding,
        EmbeddingKind::Image,
        query_label.clone(),
        category,
        limit,
    )
    .await?;

    Ok(Json(build_response(query_label, matches, limit)))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Run the catalog search on the blocking pool and log the outcome.
async fn run_search(
    state: &AppState,
    embedding: Vec<f32>,
    kind: EmbeddingKind,
    query_label: String,
    category: Option<String>,
    limit: usize,
) -> ApiResult<Vec<PhotoMatch>> {
    let options = SearchOptions {
        limit,
        min_similarity: state.config.search.min_similarity,
        candidate_multiplier: state.config.search.candidate_multiplier,
    };
    let matches = state
        .with_db(move |conn| {
            search_photos(
                conn,
                &embedding,
                kind,
                &query_label,
                &SearchFilter { category },
                &options,
            )
        })
        .await?;

    tracing::info!(
        mode = kind.as_str(),
        result_count = matches.len(),
        similarity_top = matches.first().map(|m| m.similarity).unwrap_or(0.0),
        "search complete"
    );
    Ok(matches)
}

fn build_response(query: String, matches: Vec<PhotoMatch>, limit: usize) -> SearchResponse {
    let results: Vec<PhotoDto> = matches.into_iter().map(PhotoDto::from).collect();
    SearchResponse {
        metadata: SearchMeta {
            total_results: results.len(),
            limit,
        },
        query,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_request_optional_fields() {
        let req: TextSearchRequest = serde_json::from_str(r#"{"query": "sunset"}"#).unwrap();
        assert_eq!(req.query, "sunset");
        assert_eq!(req.limit, None);
        assert_eq!(req.category, None);

        let req: TextSearchRequest =
            serde_json::from_str(r#"{"query": "sunset", "limit": 5, "category": "nature"}"#)
                .unwrap();
        assert_eq!(req.limit, Some(5));
        assert_eq!(req.category.as_deref(), Some("nature"));
    }

    #[test]
    fn test_response_wire_shape() {
        let resp = build_response("sunset".into(), vec![], 20);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["query"], "sunset");
        assert_eq!(json["results"], serde_json::json!([]));
        assert_eq!(json["metadata"]["totalResults"], 0);
        assert_eq!(json["metadata"]["limit"], 20);
    }
}
