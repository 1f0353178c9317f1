//! Non-vector read paths: listing, single lookup, and click tracking.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

use crate::catalog::store::write_activity_log;
use crate::catalog::types::{Photo, PHOTO_COLUMNS};

/// One page of the photo catalog.
#[derive(Debug)]
pub struct PhotoPage {
    pub photos: Vec<Photo>,
    /// 1-based page number.
    pub page: usize,
    pub limit: usize,
    /// Total rows matching the filter, across all pages.
    pub total: usize,
    /// Total page count for this limit.
    pub pages: usize,
}

/// List photos newest-first with 1-based pagination and an optional
/// category filter.
pub fn list_photos(
    conn: &Connection,
    page: usize,
    limit: usize,
    category: Option<&str>,
) -> Result<PhotoPage> {
    let page = page.max(1);
    let limit = limit.max(1);
    let offset = (page - 1) * limit;

    let (total, photos) = match category {
        Some(cat) => {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM photos WHERE category = ?1",
                params![cat],
                |row| row.get(0),
            )?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {PHOTO_COLUMNS} FROM photos WHERE category = ?1 \
                 ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
            ))?;
            let photos = stmt
                .query_map(params![cat, limit as i64, offset as i64], Photo::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            (total as usize, photos)
        }
        None => {
            let total: i64 =
                conn.query_row("SELECT COUNT(*) FROM photos", [], |row| row.get(0))?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {PHOTO_COLUMNS} FROM photos \
                 ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
            ))?;
            let photos = stmt
                .query_map(params![limit as i64, offset as i64], Photo::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            (total as usize, photos)
        }
    };

    Ok(PhotoPage {
        photos,
        page,
        limit,
        total,
        pages: total.div_ceil(limit),
    })
}

/// Fetch a single photo by ID.
pub fn get_photo(conn: &Connection, id: &str) -> Result<Option<Photo>> {
    conn.query_row(
        &format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = ?1"),
        params![id],
        Photo::from_row,
    )
    .optional()
    .map_err(Into::into)
}

/// Record that a photo was opened. Returns the new click count, or `None`
/// if no such photo exists.
pub fn record_click(conn: &Connection, id: &str) -> Result<Option<u32>> {
    let rows = conn.execute(
        "UPDATE photos SET click_count = click_count + 1 WHERE id = ?1",
        params![id],
    )?;
    if rows == 0 {
        return Ok(None);
    }

    write_activity_log(conn, "click", Some(id), None)?;

    let count: u32 = conn.query_row(
        "SELECT click_count FROM photos WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(Some(count))
}
