#![allow(dead_code)]

use rusqlite::Connection;
use viewfinder::catalog::store::{add_photo, AddPhotoResult};
use viewfinder::catalog::types::{Author, PhotoDraft};
use viewfinder::db;
use viewfinder::db::schema::EMBEDDING_DIM;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::load_sqlite_vec();
    let conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    db::schema::init_schema(&conn).unwrap();
    db::migrations::run_migrations(&conn).unwrap();
    conn
}

/// Generate a deterministic 1024-dim embedding with a spike at position `seed`.
/// Each seed produces a distinct, orthogonal vector.
pub fn test_embedding(seed: u8) -> Vec<f32> {
    let mut v = vec![0.0f32; EMBEDDING_DIM];
    v[seed as usize % EMBEDDING_DIM] = 1.0;
    v
}

/// Generate an embedding similar to `base` with small perturbation.
/// The result will have high cosine similarity to `base`.
pub fn similar_embedding(base: &[f32]) -> Vec<f32> {
    let mut v = base.to_vec();
    // Add small noise to a few dimensions to create a near-duplicate
    for i in 0..5 {
        v[(i * 137) % EMBEDDING_DIM] += 0.05;
    }
    // L2 normalize
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

/// Insert a test photo directly via the store module.
pub fn insert_photo(
    conn: &mut Connection,
    title: &str,
    description: &str,
    category: &str,
    text_embedding: &[f32],
    image_embedding: &[f32],
) -> AddPhotoResult {
    let draft = PhotoDraft {
        title: title.to_string(),
        description: description.to_string(),
        image_uri: "data:image/jpeg;base64,QUJD".to_string(),
        thumbnail_uri: "data:image/jpeg;base64,REVG".to_string(),
        category: category.to_string(),
        tags: vec![],
        author: Some(Author::from_name("Test User")),
        width: 640,
        height: 480,
        size_bytes: 2048,
    };
    add_photo(conn, &draft, text_embedding, image_embedding).unwrap()
}

/// Encode a small PNG in memory for upload pipeline tests.
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 96])
    });
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}
