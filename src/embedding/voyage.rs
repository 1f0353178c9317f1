//! Voyage AI multimodal embedding provider.
//!
//! Talks to the `/v1/multimodalembeddings` endpoint. A request carries one
//! input whose content is a list of parts (text, image, or both), so a photo
//! and its caption land in a single joint vector.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{l2_normalize, EmbeddingProvider, InputType, EMBEDDING_DIM};
use crate::config::EmbeddingConfig;

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    inputs: Vec<EmbedInput<'a>>,
    model: &'a str,
    input_type: &'a str,
}

#[derive(Debug, Serialize)]
struct EmbedInput<'a> {
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Content<'a> {
    Text { text: &'a str },
    ImageBase64 { image_base64: &'a str },
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Debug, Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

/// Remote embedding provider backed by the Voyage AI API.
pub struct VoyageProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl VoyageProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .context("voyage provider requires an API key (set VOYAGE_API_KEY)")?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    async fn embed_content(
        &self,
        content: Vec<Content<'_>>,
        input_type: InputType,
    ) -> Result<Vec<f32>> {
        let url = format!("{}/multimodalembeddings", self.base_url);
        let request = EmbedRequest {
            inputs: vec![EmbedInput { content }],
            model: &self.model,
            input_type: input_type.as_str(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("voyage embedding request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("voyage API returned {status}: {body}");
        }

        let body: EmbedResponse = response
            .json()
            .await
            .context("failed to parse voyage embedding response")?;

        let mut embedding = body
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .context("voyage response contained no embeddings")?;

        anyhow::ensure!(
            embedding.len() == EMBEDDING_DIM,
            "unexpected embedding width {} from voyage (expected {EMBEDDING_DIM})",
            embedding.len()
        );

        l2_normalize(&mut embedding);
        Ok(embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for VoyageProvider {
    async fn embed_text(&self, text: &str, input_type: InputType) -> Result<Vec<f32>> {
        self.embed_content(vec![Content::Text { text }], input_type)
            .await
    }

    async fn embed_image(
        &self,
        image_uri: &str,
        caption: Option<&str>,
        input_type: InputType,
    ) -> Result<Vec<f32>> {
        let mut content = Vec::with_capacity(2);
        if let Some(caption) = caption.filter(|c| !c.trim().is_empty()) {
            content.push(Content::Text { text: caption });
        }
        content.push(Content::ImageBase64 {
            image_base64: image_uri,
        });
        self.embed_content(content, input_type).await
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn name(&self) -> &'static str {
        "voyage"
    }
}
