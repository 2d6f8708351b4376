//! OpenAI Embedding Provider
//!
//! Implements the `EmbeddingProvider` port using OpenAI's embedding API.
//! Supports text-embedding-3-small, text-embedding-3-large and ada-002;
//! an explicit dimension can be requested from the v3 models.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use kindred_application::ports::registry::{
    EMBEDDING_PROVIDERS, EmbeddingProviderConfig, EmbeddingProviderEntry,
};
use kindred_domain::error::{Error, Result};
use kindred_domain::ports::EmbeddingProvider;
use kindred_domain::value_objects::Embedding;

use crate::constants::{
    CONTENT_TYPE_JSON, EMBEDDING_DIMENSION_OPENAI_ADA, EMBEDDING_DIMENSION_OPENAI_LARGE,
    EMBEDDING_DIMENSION_OPENAI_SMALL, HTTP_REQUEST_TIMEOUT_SECS, OPENAI_BASE_URL_DEFAULT,
    OPENAI_EMBEDDING_MODEL_DEFAULT,
};
use crate::http::HttpClientConfig;
use crate::utils::HttpResponseUtils;

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

/// OpenAI embedding provider
///
/// Receives its HTTP client via constructor injection.
pub struct OpenAIEmbeddingProvider {
    api_key: String,
    base_url: Option<String>,
    model: String,
    dimensions: Option<usize>,
    timeout: Duration,
    http_client: Client,
}

impl OpenAIEmbeddingProvider {
    /// Create a new OpenAI embedding provider
    ///
    /// # Arguments
    /// * `api_key` - OpenAI API key
    /// * `base_url` - Optional custom base URL (defaults to the OpenAI API)
    /// * `model` - Model name (e.g., "text-embedding-3-small")
    /// * `timeout` - Request timeout duration
    /// * `http_client` - Reqwest HTTP client for making API requests
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: String,
        timeout: Duration,
        http_client: Client,
    ) -> Self {
        Self {
            api_key: api_key.trim().to_string(),
            base_url: base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            model,
            dimensions: None,
            timeout,
            http_client,
        }
    }

    /// Request vectors of `dimensions` (v3 models only)
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Get the base URL for this provider
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(OPENAI_BASE_URL_DEFAULT)
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn fetch_embeddings(&self, texts: &[String]) -> Result<EmbeddingResponse> {
        let mut payload = serde_json::json!({
            "input": texts,
            "model": self.model,
            "encoding_format": "float"
        });
        if let Some(dimensions) = self.dimensions {
            payload["dimensions"] = serde_json::json!(dimensions);
        }

        let response = self
            .http_client
            .post(format!("{}/embeddings", self.base_url()))
            .bearer_auth(&self.api_key)
            .header("Content-Type", CONTENT_TYPE_JSON)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| HttpResponseUtils::transport_error(self.provider_name(), &e))?;

        HttpResponseUtils::check_and_parse(response, self.provider_name()).await
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut response = self.fetch_embeddings(texts).await?;
        if response.data.len() != texts.len() {
            return Err(Error::external_service(
                self.provider_name(),
                format!(
                    "response data count mismatch: expected {}, got {}",
                    texts.len(),
                    response.data.len()
                ),
            ));
        }
        response.data.sort_by_key(|datum| datum.index);

        Ok(response
            .data
            .into_iter()
            .map(|datum| Embedding {
                dimensions: datum.embedding.len(),
                vector: datum.embedding,
                model: self.model.clone(),
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        if let Some(dimensions) = self.dimensions {
            return dimensions;
        }
        match self.model.as_str() {
            "text-embedding-3-large" => EMBEDDING_DIMENSION_OPENAI_LARGE,
            "text-embedding-ada-002" => EMBEDDING_DIMENSION_OPENAI_ADA,
            _ => EMBEDDING_DIMENSION_OPENAI_SMALL,
        }
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

fn openai_embedding_factory(
    config: &EmbeddingProviderConfig,
) -> std::result::Result<Arc<dyn EmbeddingProvider>, String> {
    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| "OpenAI requires api_key".to_string())?;
    let model = config
        .model
        .clone()
        .unwrap_or_else(|| OPENAI_EMBEDDING_MODEL_DEFAULT.to_string());
    let timeout = config
        .timeout
        .unwrap_or(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS));
    let http_client = HttpClientConfig::with_timeout(timeout).build()?;

    let mut provider =
        OpenAIEmbeddingProvider::new(api_key, config.base_url.clone(), model, timeout, http_client);
    if let Some(dimensions) = config.dimensions {
        provider = provider.with_dimensions(dimensions);
    }
    Ok(Arc::new(provider))
}

#[linkme::distributed_slice(EMBEDDING_PROVIDERS)]
static OPENAI_PROVIDER: EmbeddingProviderEntry = EmbeddingProviderEntry {
    name: "openai",
    description: "OpenAI embedding provider (text-embedding-3-small/large, ada-002)",
    factory: openai_embedding_factory,
};
