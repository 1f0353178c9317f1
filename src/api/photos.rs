//! Photo CRUD endpoints: paginated listing, multi-file upload, single
//! lookup, and click tracking.

use axum::body::Bytes;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::types::PhotoDto;
use crate::api::{category_filter, resolve_limit, AppState};
use crate::catalog::browse;
use crate::catalog::store::{add_photo, AddPhotoResult};
use crate::catalog::types::{normalize_category, parse_tags, Author, PhotoDraft};
use crate::embedding::InputType;
use crate::imaging;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PhotoListResponse {
    pub photos: Vec<PhotoDto>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

#[derive(Debug, Serialize)]
pub struct AddedPhoto {
    pub id: String,
    pub title: String,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub added: Vec<AddedPhoto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickResponse {
    pub id: String,
    pub click_count: u32,
}

/// GET /api/photos - Paginated listing, newest first.
pub async fn list_photos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PhotoListResponse>> {
    if params.page == Some(0) {
        return Err(ApiError::BadRequest("Page must be at least 1".into()));
    }
    let page = params.page.unwrap_or(1);
    let limit = resolve_limit(params.limit, &state.config)?;
    let category = category_filter(params.category.as_deref())?;

    let page_data = state
        .with_db(move |conn| browse::list_photos(conn, page, limit, category.as_deref()))
        .await?;

    Ok(Json(PhotoListResponse {
        photos: page_data.photos.into_iter().map(PhotoDto::from).collect(),
        pagination: Pagination {
            page: page_data.page,
            limit: page_data.limit,
            total: page_data.total,
            pages: page_data.pages,
        },
    }))
}

/// POST /api/photos - Multi-file upload.
///
/// Multipart fields: repeated `photos` file parts plus shared `title`,
/// `description`, `category`, `tags` (comma-separated), `authorName`.
/// Files are processed independently; per-file failures collect into
/// `errors` while the rest are inserted. 201 when at least one photo
/// landed, 400 when none did.
pub async fn upload_photos(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    // 1. Collect files and shared form fields
    let mut files: Vec<(String, Bytes)> = Vec::new();
    let mut title = String::new();
    let mut description = String::new();
    let mut category: Option<String> = None;
    let mut tags_raw = String::new();
    let mut author_name = String::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "photos" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                files.push((filename, field.bytes().await?));
            }
            "title" => title = field.text().await?,
            "description" => description = field.text().await?,
            "category" => category = Some(field.text().await?),
            "tags" => tags_raw = field.text().await?,
            "authorName" => author_name = field.text().await?,
            _ => {}
        }
    }

    if files.is_empty() || files.iter().all(|(name, _)| name.is_empty()) {
        return Err(ApiError::BadRequest("No photo files provided".into()));
    }

    // 2. Shared metadata for the whole batch
    let category = normalize_category(category.as_deref()).map_err(ApiError::BadRequest)?;
    let tags = parse_tags(&tags_raw);
    let author_name = if author_name.trim().is_empty() {
        "Unknown".to_string()
    } else {
        author_name.trim().to_string()
    };
    let author = Author::from_name(&author_name);
    let title = title.trim().to_string();
    let description = description.trim().to_string();

    tracing::info!(files = files.len(), category = %category, "photo upload");

    // 3. Process each file independently
    let mut added: Vec<AddedPhoto> = Vec::new();
    let mut errors: Vec<String> = Vec::new();

    for (i, (filename, bytes)) in files.into_iter().enumerate() {
        if filename.is_empty() {
            errors.push(format!("File {}: Invalid file type", i + 1));
            continue;
        }

        match ingest_one(
            &state,
            i,
            bytes,
            &title,
            &description,
            &category,
            &tags,
            &author,
        )
        .await
        {
            Ok(result) => added.push(AddedPhoto {
                id: result.id,
                title: result.title,
                filename,
            }),
            Err(err) => errors.push(format!("File {} ({}): {}", i + 1, filename, err)),
        }
    }

    // 4. 201 when at least one photo landed, 400 when none did
    let status = if added.is_empty() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::CREATED
    };
    tracing::info!(added = added.len(), failed = errors.len(), "upload complete");

    Ok((
        status,
        Json(UploadResponse {
            message: format!("Successfully added {} photos", added.len()),
            added,
            errors,
        }),
    ))
}

/// GET /api/photos/{id} - Single photo. Fetching by ID counts as a
/// click-through.
pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PhotoDto>> {
    let photo = state
        .with_db(move |conn| {
            let Some(mut photo) = browse::get_photo(conn, &id)? else {
                return Ok(None);
            };
            if let Some(count) = browse::record_click(conn, &photo.id)? {
                photo.click_count = count;
            }
            Ok(Some(photo))
        })
        .await?
        .ok_or_else(|| ApiError::NotFound("Photo not found".into()))?;

    Ok(Json(PhotoDto::from(photo)))
}

/// POST /api/photos/{id}/click - Explicit click tracking.
pub async fn click_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ClickResponse>> {
    let id_for_db = id.clone();
    let count = state
        .with_db(move |conn| browse::record_click(conn, &id_for_db))
        .await?
        .ok_or_else(|| ApiError::NotFound("Photo not found".into()))?;

    tracing::info!(photo_id = %id, click_count = count, "click recorded");
    Ok(Json(ClickResponse {
        id,
        click_count: count,
    }))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Full ingest pipeline for one uploaded file: decode/downscale, embed
/// both modalities, persist photo row and vectors in one transaction.
#[allow(clippy::too_many_arguments)]
async fn ingest_one(
    state: &AppState,
    index: usize,
    bytes: Bytes,
    title: &str,
    description: &str,
    category: &str,
    tags: &[String],
    author: &Author,
) -> anyhow::Result<AddPhotoResult> {
    // 1. Decode, downscale, thumbnail (CPU-heavy → blocking pool)
    let processed = tokio::task::spawn_blocking(move || imaging::process_image(&bytes))
        .await
        .map_err(|e| anyhow::anyhow!("imaging task failed: {e}"))??;

    // 2. Build the draft and embed both modalities
    let draft = PhotoDraft {
        title: if title.is_empty() {
            format!("Photo {}", index + 1)
        } else {
            title.to_string()
        },
        description: description.to_string(),
        image_uri: processed.image_uri,
        thumbnail_uri: processed.thumbnail_uri,
        category: category.to_string(),
        tags: tags.to_vec(),
        author: Some(author.clone()),
        width: processed.width,
        height: processed.height,
        size_bytes: processed.size_bytes,
    };

    let text = draft.embedding_text();
    let text_embedding = state
        .embedding
        .embed_text(&text, InputType::Document)
        .await?;
    let caption = (!description.is_empty()).then_some(description);
    let image_embedding = state
        .embedding
        .embed_image(&draft.image_uri, caption, InputType::Document)
        .await?;

    // 3. Persist photo row and both vectors in one transaction
    let result = state
        .with_db(move |conn| add_photo(conn, &draft, &text_embedding, &image_embedding))
        .await?;

    tracing::info!(photo_id = %result.id, title = %result.title, "photo ingested");
    Ok(result)
}
