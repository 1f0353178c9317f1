//! Deterministic offline embedding provider.
//!
//! Hashes the input with blake3 and tiles the digest bytes (mapped into
//! [-0.5, 0.5]) across the full vector width, then L2-normalizes. Identical
//! inputs always produce identical vectors, which is enough to demo the full
//! ingest/search pipeline without API credentials. Vectors carry no semantic
//! meaning: only exact-text matches score high.

use anyhow::Result;
use async_trait::async_trait;

use super::{l2_normalize, EmbeddingProvider, InputType, EMBEDDING_DIM};

/// Placeholder token hashed in place of actual pixel data.
const IMAGE_TOKEN: &str = "[IMAGE_CONTENT]";

pub struct MockProvider {
    model: String,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            model: "mock-blake3".into(),
        }
    }

    fn vector_for(text: &str) -> Vec<f32> {
        let digest = blake3::hash(text.as_bytes());
        let bytes = digest.as_bytes();

        let mut vector = Vec::with_capacity(EMBEDDING_DIM);
        while vector.len() < EMBEDDING_DIM {
            for &b in bytes.iter() {
                if vector.len() == EMBEDDING_DIM {
                    break;
                }
                vector.push(b as f32 / 255.0 - 0.5);
            }
        }

        l2_normalize(&mut vector);
        vector
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockProvider {
    async fn embed_text(&self, text: &str, _input_type: InputType) -> Result<Vec<f32>> {
        Ok(Self::vector_for(text))
    }

    async fn embed_image(
        &self,
        _image_uri: &str,
        caption: Option<&str>,
        _input_type: InputType,
    ) -> Result<Vec<f32>> {
        // Pixels are ignored offline; the caption (if any) still steers the vector.
        let text = match caption.filter(|c| !c.trim().is_empty()) {
            Some(caption) => format!("{caption} {IMAGE_TOKEN}"),
            None => IMAGE_TOKEN.to_string(),
        };
        Ok(Self::vector_for(&text))
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
