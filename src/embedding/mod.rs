//! Multimodal embedding pipeline.
//!
//! Provides the [`EmbeddingProvider`] trait with two implementations: the
//! Voyage AI multimodal API ([`voyage::VoyageProvider`]) and a deterministic
//! offline mock ([`mock::MockProvider`]) used when no API key is configured.
//! All providers produce L2-normalized vectors of [`EMBEDDING_DIM`] dimensions,
//! so cosine similarity can be recovered from L2 distance at query time.

pub mod mock;
pub mod voyage;

use anyhow::Result;
use async_trait::async_trait;

pub use crate::db::schema::EMBEDDING_DIM;

/// Whether an input is a search query or a document being indexed.
/// Voyage embeds the two sides of an asymmetric retrieval task differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Query,
    Document,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Query => "query",
            InputType::Document => "document",
        }
    }
}

/// Trait for embedding text and images into a shared vector space.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a text string into a vector.
    async fn embed_text(&self, text: &str, input_type: InputType) -> Result<Vec<f32>>;

    /// Embed an image (as a base64 data URI), optionally with a caption that
    /// is embedded jointly with the pixels.
    async fn embed_image(
        &self,
        image_uri: &str,
        caption: Option<&str>,
        input_type: InputType,
    ) -> Result<Vec<f32>>;

    /// Identifier of the underlying model, recorded in `schema_meta`.
    fn model_id(&self) -> &str;

    /// Human-readable provider name for logs and health output.
    fn name(&self) -> &'static str;

    /// Return the number of dimensions this provider produces.
    fn dimensions(&self) -> usize {
        EMBEDDING_DIM
    }
}

/// Create an embedding provider from config.
///
/// `"voyage"` uses the remote API when an API key is configured and falls
/// back to the deterministic mock otherwise, so the service runs end to end
/// without credentials. `"mock"` forces the offline provider.
pub fn create_provider(
    config: &crate::config::EmbeddingConfig,
) -> Result<Box<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "voyage" => match config.api_key.as_deref() {
            Some(key) if !key.is_empty() => {
                let provider = voyage::VoyageProvider::new(config)?;
                Ok(Box::new(provider))
            }
            _ => {
                tracing::warn!(
                    "VOYAGE_API_KEY not set, using deterministic mock embeddings (demo mode)"
                );
                Ok(Box::new(mock::MockProvider::new()))
            }
        },
        "mock" => Ok(Box::new(mock::MockProvider::new())),
        other => anyhow::bail!("unknown embedding provider: {other}. Supported: voyage, mock"),
    }
}

/// L2-normalize a vector in place. Leaves a zero vector untouched.
pub(crate) fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
