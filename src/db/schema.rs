//! SQL DDL for all Viewfinder tables.
//!
//! Defines the `photos` table, the `photos_text_vec` / `photos_image_vec`
//! (vec0) virtual tables, `activity_log`, and `schema_meta`. All DDL uses
//! `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

/// Dimensionality of stored embedding vectors (voyage-multimodal-3).
pub const EMBEDDING_DIM: usize = 1024;

/// All schema DDL statements for Viewfinder's core tables.
const SCHEMA_SQL: &str = r#"
-- Photo catalog
CREATE TABLE IF NOT EXISTS photos (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    image_uri TEXT NOT NULL,
    thumbnail_uri TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT 'other',
    tags TEXT,
    author_name TEXT,
    author_username TEXT,
    width INTEGER NOT NULL DEFAULT 0,
    height INTEGER NOT NULL DEFAULT 0,
    size_bytes INTEGER NOT NULL DEFAULT 0,
    search_count INTEGER NOT NULL DEFAULT 0,
    click_count INTEGER NOT NULL DEFAULT 0,
    last_seen_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_photos_category ON photos(category);
CREATE INDEX IF NOT EXISTS idx_photos_created ON photos(created_at);

-- Activity log
CREATE TABLE IF NOT EXISTS activity_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    operation TEXT NOT NULL CHECK(operation IN ('upload','search','click')),
    photo_id TEXT,
    details TEXT,
    created_at TEXT NOT NULL
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// vec0 virtual tables must be created separately (sqlite-vec syntax).
/// One table per modality so a text query never matches against image vectors.
const VEC_TABLE_SQL: &str = r#"
CREATE VIRTUAL TABLE IF NOT EXISTS photos_text_vec USING vec0(
    id TEXT PRIMARY KEY,
    embedding FLOAT[1024]
);

CREATE VIRTUAL TABLE IF NOT EXISTS photos_image_vec USING vec0(
    id TEXT PRIMARY KEY,
    embedding FLOAT[1024]
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute_batch(VEC_TABLE_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
