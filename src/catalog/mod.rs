pub mod browse;
pub mod search;
pub mod stats;
pub mod store;
pub mod types;

/// Convert an f32 embedding slice to raw bytes for sqlite-vec.
pub fn embedding_to_bytes(embedding: &[f32]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            embedding.as_ptr() as *const u8,
            embedding.len() * std::mem::size_of::<f32>(),
        )
    }
}

/// Recover cosine similarity from the L2 distance sqlite-vec reports.
///
/// Stored and query vectors are unit-length, so `d² = 2 − 2·cos`.
pub fn l2_to_cosine(distance: f64) -> f64 {
    1.0 - (distance * distance) / 2.0
}

/// Largest L2 distance a pair of unit vectors can have while still meeting
/// the given cosine similarity.
pub fn cosine_threshold_to_l2(threshold: f64) -> f64 {
    (2.0 * (1.0 - threshold)).max(0.0).sqrt()
}

/// Round a similarity score for presentation (3 decimal places).
pub fn round_similarity(similarity: f64) -> f64 {
    (similarity * 1000.0).round() / 1000.0
}
