use anyhow::Result;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::path::Path;

/// A category with its photo count.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: u64,
}

/// Aggregate statistics for the whole library.
#[derive(Debug, Serialize)]
pub struct LibraryStats {
    pub total_photos: u64,
    pub by_category: Vec<CategoryCount>,
    pub total_uploads: u64,
    pub total_searches: u64,
    pub total_clicks: u64,
    pub db_size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_photo: Option<String>,
}

/// Categories in use, ordered by photo count descending, then name.
pub fn categories(conn: &Connection) -> Result<Vec<CategoryCount>> {
    let mut stmt = conn.prepare(
        "SELECT category, COUNT(*) AS n FROM photos \
         GROUP BY category ORDER BY n DESC, category ASC",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(CategoryCount {
                name: row.get(0)?,
                count: row.get::<_, i64>(1)? as u64,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Compute library statistics.
///
/// `db_path` is used for file size calculation; pass None for in-memory databases.
pub fn library_stats(conn: &Connection, db_path: Option<&Path>) -> Result<LibraryStats> {
    let total_photos: i64 = conn.query_row("SELECT COUNT(*) FROM photos", [], |row| row.get(0))?;
    let by_category = categories(conn)?;
    let total_uploads = count_activity(conn, "upload")?;
    let total_searches = count_activity(conn, "search")?;
    let total_clicks = count_activity(conn, "click")?;
    let (oldest, newest) = photo_time_range(conn)?;

    let db_size_bytes = db_path
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .unwrap_or(0);

    Ok(LibraryStats {
        total_photos: total_photos as u64,
        by_category,
        total_uploads,
        total_searches,
        total_clicks,
        db_size_bytes,
        oldest_photo: oldest,
        newest_photo: newest,
    })
}

/// Count activity log entries for one operation.
fn count_activity(conn: &Connection, operation: &str) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM activity_log WHERE operation = ?1",
        params![operation],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Oldest and newest photo timestamps.
fn photo_time_range(conn: &Connection) -> Result<(Option<String>, Option<String>)> {
    let (oldest, newest): (Option<String>, Option<String>) = conn.query_row(
        "SELECT MIN(created_at), MAX(created_at) FROM photos",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok((oldest, newest))
}
