//! Write path — photo row, embedding vectors, and activity logging.
//!
//! [`add_photo`] is the single entry point. It runs the full pipeline inside a
//! transaction: insert into the photos table, insert the text and image
//! embedding vectors, and write an activity log entry.

use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

use crate::catalog::types::{EmbeddingKind, PhotoDraft};
use crate::db::schema::EMBEDDING_DIM;

/// Identity of a freshly stored photo.
#[derive(Debug)]
pub struct AddPhotoResult {
    /// UUID of the stored photo.
    pub id: String,
    pub title: String,
}

/// Full write path: photo row → text vector → image vector → activity log.
///
/// All operations run inside a transaction for atomicity.
pub fn add_photo(
    conn: &mut Connection,
    draft: &PhotoDraft,
    text_embedding: &[f32],
    image_embedding: &[f32],
) -> Result<AddPhotoResult> {
    ensure_dims(text_embedding)?;
    ensure_dims(image_embedding)?;

    let tx = conn.transaction()?;

    // 1. Generate UUID v7
    let id = uuid::Uuid::now_v7().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    // 2. Insert into photos table
    insert_photo(&tx, &id, draft, &now)?;

    // 3. Insert embedding vectors, one per modality
    insert_vec(&tx, EmbeddingKind::Text, &id, text_embedding)?;
    insert_vec(&tx, EmbeddingKind::Image, &id, image_embedding)?;

    // 4. Activity log
    write_activity_log(
        &tx,
        "upload",
        Some(&id),
        Some(&serde_json::json!({"title": draft.title, "category": draft.category})),
    )?;

    tx.commit()?;

    Ok(AddPhotoResult {
        id,
        title: draft.title.clone(),
    })
}

fn ensure_dims(embedding: &[f32]) -> Result<()> {
    anyhow::ensure!(
        embedding.len() == EMBEDDING_DIM,
        "embedding has {} dimensions, expected {EMBEDDING_DIM}",
        embedding.len()
    );
    Ok(())
}

/// Insert a new photo row.
fn insert_photo(conn: &Transaction, id: &str, draft: &PhotoDraft, now: &str) -> Result<()> {
    let tags_json = if draft.tags.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&draft.tags)?)
    };
    let (author_name, author_username) = match &draft.author {
        Some(a) => (Some(a.name.as_str()), Some(a.username.as_str())),
        None => (None, None),
    };

    conn.execute(
        "INSERT INTO photos (id, title, description, image_uri, thumbnail_uri, category, tags, \
         author_name, author_username, width, height, size_bytes, search_count, click_count, \
         created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 0, 0, ?13, ?13)",
        params![
            id,
            draft.title,
            draft.description,
            draft.image_uri,
            draft.thumbnail_uri,
            draft.category,
            tags_json,
            author_name,
            author_username,
            draft.width,
            draft.height,
            draft.size_bytes,
            now,
        ],
    )?;

    Ok(())
}

/// Insert an embedding vector into the modality's vec0 virtual table.
fn insert_vec(
    conn: &Transaction,
    kind: EmbeddingKind,
    id: &str,
    embedding: &[f32],
) -> Result<()> {
    let embedding_bytes = super::embedding_to_bytes(embedding);
    conn.execute(
        &format!("INSERT INTO {} (id, embedding) VALUES (?1, ?2)", kind.table()),
        params![id, embedding_bytes],
    )?;
    Ok(())
}

/// Write an entry to the activity_log table.
pub(crate) fn write_activity_log(
    conn: &Connection,
    operation: &str,
    photo_id: Option<&str>,
    details: Option<&serde_json::Value>,
) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    let details_json = details.map(|d| d.to_string());
    conn.execute(
        "INSERT INTO activity_log (operation, photo_id, details, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![operation, photo_id, details_json, now],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::Author;
    use crate::db;

    fn test_db() -> Connection {
        db::open_memory_database().unwrap()
    }

    /// Unit vector along the given dimension.
    fn embedding(dim: usize) -> Vec<f32> {
        let mut v = vec![0.0f32; EMBEDDING_DIM];
        v[dim % EMBEDDING_DIM] = 1.0;
        v
    }

    fn draft(title: &str) -> PhotoDraft {
        PhotoDraft {
            title: title.into(),
            description: "A test photo".into(),
            image_uri: "data:image/jpeg;base64,QUJD".into(),
            thumbnail_uri: "data:image/jpeg;base64,REVG".into(),
            category: "nature".into(),
            tags: vec![],
            author: None,
            width: 640,
            height: 480,
            size_bytes: 12345,
        }
    }

    #[test]
    fn test_add_photo_writes_all_tables() {
        let mut conn = test_db();

        let result = add_photo(&mut conn, &draft("Forest path"), &embedding(0), &embedding(1))
            .unwrap();
        assert_eq!(result.title, "Forest path");

        // Verify in photos table
        let title: String = conn
            .query_row(
                "SELECT title FROM photos WHERE id = ?1",
                params![result.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(title, "Forest path");

        // Verify both vector tables
        for table in ["photos_text_vec", "photos_image_vec"] {
            let vec_id: String = conn
                .query_row(
                    &format!("SELECT id FROM {table} WHERE id = ?1"),
                    params![result.id],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(vec_id, result.id);
        }
    }

    #[test]
    fn test_add_photo_logs_upload() {
        let mut conn = test_db();

        let result =
            add_photo(&mut conn, &draft("Logged"), &embedding(0), &embedding(1)).unwrap();

        let (op, pid): (String, Option<String>) = conn
            .query_row(
                "SELECT operation, photo_id FROM activity_log WHERE photo_id = ?1",
                params![result.id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(op, "upload");
        assert_eq!(pid.as_deref(), Some(result.id.as_str()));
    }

    #[test]
    fn test_tags_and_author_round_trip() {
        let mut conn = test_db();

        let mut d = draft("Tagged");
        d.tags = vec!["sunset".into(), "beach".into()];
        d.author = Some(Author::from_name("Jane Doe"));

        let result = add_photo(&mut conn, &d, &embedding(0), &embedding(1)).unwrap();

        let photo = crate::catalog::browse::get_photo(&conn, &result.id)
            .unwrap()
            .unwrap();
        assert_eq!(photo.tags, vec!["sunset", "beach"]);
        let author = photo.author.unwrap();
        assert_eq!(author.name, "Jane Doe");
        assert_eq!(author.username, "@jane_doe");
    }

    #[test]
    fn test_missing_author_stays_null() {
        let mut conn = test_db();

        let result = add_photo(&mut conn, &draft("Anon"), &embedding(0), &embedding(1)).unwrap();

        let photo = crate::catalog::browse::get_photo(&conn, &result.id)
            .unwrap()
            .unwrap();
        assert!(photo.author.is_none());
        assert!(photo.tags.is_empty());
    }

    #[test]
    fn test_new_photo_has_zero_counters() {
        let mut conn = test_db();

        let result =
            add_photo(&mut conn, &draft("Fresh"), &embedding(0), &embedding(1)).unwrap();

        let (searches, clicks): (u32, u32) = conn
            .query_row(
                "SELECT search_count, click_count FROM photos WHERE id = ?1",
                params![result.id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(searches, 0);
        assert_eq!(clicks, 0);
    }

    #[test]
    fn test_wrong_embedding_width_rejected() {
        let mut conn = test_db();

        let short = vec![1.0f32; 8];
        let result = add_photo(&mut conn, &draft("Bad"), &short, &embedding(1));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("dimensions"));

        // Nothing was written
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM photos", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
