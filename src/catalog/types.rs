//! Core photo catalog types.
//!
//! Defines [`Photo`] (a full catalog record), [`PhotoDraft`] (the input to the
//! write path), [`Author`] (uploader attribution), and [`EmbeddingKind`] (which
//! vector table a query runs against).

use serde::{Deserialize, Serialize};

/// Fallback category for uploads that don't specify one.
pub const DEFAULT_CATEGORY: &str = "other";

/// Longest accepted category name.
pub const MAX_CATEGORY_LEN: usize = 32;

/// Which modality a vector belongs to. Each modality has its own vec0 table
/// so a text query never ranks against image vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingKind {
    Text,
    Image,
}

impl EmbeddingKind {
    /// Name of the backing vec0 virtual table.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Text => "photos_text_vec",
            Self::Image => "photos_image_vec",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

impl std::fmt::Display for EmbeddingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uploader attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name as given at upload time.
    pub name: String,
    /// Derived handle, e.g. `"Jane Doe"` → `"@jane_doe"`.
    pub username: String,
}

impl Author {
    /// Build attribution from a display name, deriving the handle.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        let username = format!("@{}", name.to_lowercase().replace(' ', "_"));
        Self {
            name: name.to_string(),
            username,
        }
    }
}

/// A photo record, matching the `photos` table schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    /// UUID v7 (time-sortable) primary key.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Display-sized JPEG as a base64 data URI.
    pub image_uri: String,
    /// Thumbnail JPEG as a base64 data URI.
    pub thumbnail_uri: String,
    /// Normalized category name (lowercase, hyphenated).
    pub category: String,
    pub tags: Vec<String>,
    pub author: Option<Author>,
    /// Original upload dimensions in pixels.
    pub width: u32,
    pub height: u32,
    /// Original upload size in bytes.
    pub size_bytes: u64,
    /// Number of times this photo appeared in search results.
    pub search_count: u32,
    /// Number of times this photo was opened.
    pub click_count: u32,
    /// ISO 8601 timestamp of the last search hit, or `None` if never seen.
    pub last_seen_at: Option<String>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-modification timestamp.
    pub updated_at: String,
}

/// Column list matching what [`Photo::from_row`] hydrates. Every SELECT that
/// produces a `Photo` must use exactly these columns in this order.
pub(crate) const PHOTO_COLUMNS: &str =
    "id, title, description, image_uri, thumbnail_uri, category, tags, \
     author_name, author_username, width, height, size_bytes, \
     search_count, click_count, last_seen_at, created_at, updated_at";

impl Photo {
    /// Hydrate from a row selected with [`PHOTO_COLUMNS`].
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let tags_json: Option<String> = row.get(6)?;
        let author_name: Option<String> = row.get(7)?;
        let author_username: Option<String> = row.get(8)?;

        let author = match (author_name, author_username) {
            (Some(name), Some(username)) => Some(Author { name, username }),
            _ => None,
        };

        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            image_uri: row.get(3)?,
            thumbnail_uri: row.get(4)?,
            category: row.get(5)?,
            tags: tags_json
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            author,
            width: row.get(9)?,
            height: row.get(10)?,
            size_bytes: row.get(11)?,
            search_count: row.get(12)?,
            click_count: row.get(13)?,
            last_seen_at: row.get(14)?,
            created_at: row.get(15)?,
            updated_at: row.get(16)?,
        })
    }
}

/// Input for storing a new photo. The store assigns the ID and timestamps.
#[derive(Debug, Clone)]
pub struct PhotoDraft {
    pub title: String,
    pub description: String,
    pub image_uri: String,
    pub thumbnail_uri: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: Option<Author>,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

impl PhotoDraft {
    /// Text that gets embedded for this photo: `"{title}. {description}"`
    /// when both are present, otherwise whichever exists, otherwise a
    /// placeholder.
    pub fn embedding_text(&self) -> String {
        let title = self.title.trim();
        let description = self.description.trim();
        match (title.is_empty(), description.is_empty()) {
            (false, false) => format!("{title}. {description}"),
            (false, true) => title.to_string(),
            (true, false) => description.to_string(),
            (true, true) => "Untitled photo".to_string(),
        }
    }
}

/// Validate and normalize a user-supplied category name.
///
/// Trims and lowercases, then checks the charset (ASCII alphanumerics and
/// hyphens, at most [`MAX_CATEGORY_LEN`] chars). Blank or missing input falls
/// back to [`DEFAULT_CATEGORY`].
pub fn normalize_category(raw: Option<&str>) -> Result<String, String> {
    let trimmed = raw.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        return Ok(DEFAULT_CATEGORY.to_string());
    }

    let lowered = trimmed.to_ascii_lowercase();
    if lowered.len() > MAX_CATEGORY_LEN {
        return Err(format!(
            "category too long ({} chars, max {MAX_CATEGORY_LEN})",
            lowered.len()
        ));
    }
    if !lowered.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(format!(
            "invalid category '{lowered}': use letters, digits, and hyphens"
        ));
    }

    Ok(lowered)
}

/// Parse a comma-separated tag list into trimmed, non-empty tags.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
