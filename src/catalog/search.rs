//! Similarity search over the photo catalog.
//!
//! [`search_photos`] runs the whole read path: KNN against one modality's
//! vector table, similarity threshold, batch hydration of photo records,
//! category post-filter, and usage tracking for everything returned.

use anyhow::Result;
use rusqlite::{params, Connection};
use std::collections::HashMap;

use crate::catalog::store::write_activity_log;
use crate::catalog::types::{EmbeddingKind, Photo, PHOTO_COLUMNS};

/// A photo hit with its cosine similarity to the query.
#[derive(Debug, Clone)]
pub struct PhotoMatch {
    pub photo: Photo,
    /// Cosine similarity in `[0.0, 1.0]`, rounded to 3 decimals.
    pub similarity: f64,
}

/// Filters applied after the KNN pass.
#[derive(Debug, Default, Clone)]
pub struct SearchFilter {
    /// Only return photos in this (normalized) category.
    pub category: Option<String>,
}

/// Search configuration knobs.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum number of results to return.
    pub limit: usize,
    /// Hits at or below this cosine similarity are dropped.
    pub min_similarity: f64,
    /// KNN fetches `limit * candidate_multiplier` rows so post-filters
    /// don't starve the page.
    pub candidate_multiplier: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 20,
            min_similarity: 0.1,
            candidate_multiplier: 3,
        }
    }
}

/// Full read path: KNN → similarity threshold → hydrate → category filter
/// → limit → usage tracking.
pub fn search_photos(
    conn: &Connection,
    query_embedding: &[f32],
    kind: EmbeddingKind,
    query_label: &str,
    filter: &SearchFilter,
    options: &SearchOptions,
) -> Result<Vec<PhotoMatch>> {
    // 1. Vector KNN over the chosen modality
    let candidate_limit = options.limit.max(1) * options.candidate_multiplier.max(1);
    let neighbors = knn_search(conn, kind, query_embedding, candidate_limit)?;

    // 2. Drop weak matches in distance space, then recover cosine scores
    let max_distance = super::cosine_threshold_to_l2(options.min_similarity);
    let scored: Vec<(String, f64)> = neighbors
        .into_iter()
        .filter(|(_, distance)| *distance < max_distance)
        .map(|(id, distance)| (id, super::l2_to_cosine(distance)))
        .collect();

    // 3. Batch-hydrate photo records for surviving candidates
    let candidate_ids: Vec<&str> = scored.iter().map(|(id, _)| id.as_str()).collect();
    let photos = fetch_photos(conn, &candidate_ids)?;

    // 4. Post-filter and truncate, preserving KNN order
    let mut matches: Vec<PhotoMatch> = Vec::new();
    for (id, similarity) in &scored {
        if matches.len() >= options.limit {
            break;
        }
        if let Some(photo) = photos.get(id.as_str()) {
            if let Some(ref category) = filter.category {
                if &photo.category != category {
                    continue;
                }
            }
            matches.push(PhotoMatch {
                photo: photo.clone(),
                similarity: super::round_similarity(*similarity),
            });
        }
    }

    // 5. Usage tracking for everything returned
    let returned_ids: Vec<&str> = matches.iter().map(|m| m.photo.id.as_str()).collect();
    record_search_hits(conn, &returned_ids)?;
    write_activity_log(
        conn,
        "search",
        None,
        Some(&serde_json::json!({
            "mode": kind.as_str(),
            "query": query_label,
            "results": matches.len(),
        })),
    )?;

    Ok(matches)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Vector KNN via sqlite-vec.
fn knn_search(
    conn: &Connection,
    kind: EmbeddingKind,
    embedding: &[f32],
    limit: usize,
) -> Result<Vec<(String, f64)>> {
    let embedding_bytes = super::embedding_to_bytes(embedding);
    let mut stmt = conn.prepare(&format!(
        "SELECT id, distance FROM {} WHERE embedding MATCH ?1 ORDER BY distance LIMIT ?2",
        kind.table()
    ))?;
    let results = stmt
        .query_map(params![embedding_bytes, limit as i64], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(results)
}

/// Batch-fetch photo records by IDs.
fn fetch_photos(conn: &Connection, ids: &[&str]) -> Result<HashMap<String, Photo>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    // Build a parameterized IN clause
    let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "SELECT {PHOTO_COLUMNS} FROM photos WHERE id IN ({})",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::types::ToSql> = ids
        .iter()
        .map(|id| id as &dyn rusqlite::types::ToSql)
        .collect();

    let rows = stmt
        .query_map(params.as_slice(), Photo::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut map = HashMap::new();
    for photo in rows {
        map.insert(photo.id.clone(), photo);
    }
    Ok(map)
}

/// Batch update search_count and last_seen_at for returned results.
fn record_search_hits(conn: &Connection, ids: &[&str]) -> Result<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let now = chrono::Utc::now().to_rfc3339();
    let mut stmt = conn.prepare(
        "UPDATE photos SET search_count = search_count + 1, last_seen_at = ?1 WHERE id = ?2",
    )?;
    for id in ids {
        stmt.execute(params![now, id])?;
    }
    Ok(())
}
