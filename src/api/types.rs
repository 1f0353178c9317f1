//! Wire representations of catalog records.
//!
//! Every JSON body the API emits uses camelCase keys; the structs here do
//! the renaming so the catalog layer can stay snake_case.

use serde::Serialize;

use crate::catalog::search::PhotoMatch;
use crate::catalog::types::{Author, Photo};

#[derive(Debug, Serialize)]
pub struct AuthorDto {
    pub name: String,
    pub username: String,
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            name: author.name,
            username: author.username,
        }
    }
}

/// A photo as it appears in list, single, and search responses.
///
/// `similarity` is only present on search hits.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub thumbnail_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    pub category: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorDto>,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    pub search_count: u32,
    pub click_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Photo> for PhotoDto {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            title: photo.title,
            description: photo.description,
            image_url: photo.image_uri,
            thumbnail_url: photo.thumbnail_uri,
            similarity: None,
            category: photo.category,
            tags: photo.tags,
            author: photo.author.map(Into::into),
            width: photo.width,
            height: photo.height,
            size_bytes: photo.size_bytes,
            search_count: photo.search_count,
            click_count: photo.click_count,
            last_seen_at: photo.last_seen_at,
            created_at: photo.created_at,
            updated_at: photo.updated_at,
        }
    }
}

impl From<PhotoMatch> for PhotoDto {
    fn from(m: PhotoMatch) -> Self {
        let mut dto = PhotoDto::from(m.photo);
        dto.similarity = Some(m.similarity);
        dto
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_photo() -> Photo {
        Photo {
            id: "0192aef2-1111-7000-8000-000000000001".into(),
            title: "Harbor at dawn".into(),
            description: "Fishing boats in fog".into(),
            image_uri: "data:image/jpeg;base64,QUJD".into(),
            thumbnail_uri: "data:image/jpeg;base64,REVG".into(),
            category: "nature".into(),
            tags: vec!["fog".into(), "boats".into()],
            author: Some(Author {
                name: "Jane Doe".into(),
                username: "@jane_doe".into(),
            }),
            width: 1024,
            height: 768,
            size_bytes: 123456,
            search_count: 3,
            click_count: 1,
            last_seen_at: None,
            created_at: "2026-01-01T00:00:00+00:00".into(),
            updated_at: "2026-01-01T00:00:00+00:00".into(),
        }
    }

    #[test]
    fn test_photo_dto_uses_camel_case() {
        let json = serde_json::to_value(PhotoDto::from(sample_photo())).unwrap();
        assert_eq!(json["imageUrl"], "data:image/jpeg;base64,QUJD");
        assert_eq!(json["thumbnailUrl"], "data:image/jpeg;base64,REVG");
        assert_eq!(json["searchCount"], 3);
        assert_eq!(json["clickCount"], 1);
        assert_eq!(json["sizeBytes"], 123456);
        assert_eq!(json["createdAt"], "2026-01-01T00:00:00+00:00");
        assert_eq!(json["updatedAt"], "2026-01-01T00:00:00+00:00");
        assert_eq!(json["author"]["username"], "@jane_doe");
        // Not a search hit, so no similarity key at all
        assert!(json.get("similarity").is_none());
        // Never seen by a search either
        assert!(json.get("lastSeenAt").is_none());
    }

    #[test]
    fn test_search_hit_carries_similarity() {
        let m = PhotoMatch {
            photo: sample_photo(),
            similarity: 0.873,
        };
        let json = serde_json::to_value(PhotoDto::from(m)).unwrap();
        assert_eq!(json["similarity"], 0.873);
    }

    #[test]
    fn test_missing_author_is_omitted() {
        let mut photo = sample_photo();
        photo.author = None;
        let json = serde_json::to_value(PhotoDto::from(photo)).unwrap();
        assert!(json.get("author").is_none());
    }
}
