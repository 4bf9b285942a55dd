//! Synchronous client for hosts without an async runtime
//!
//! Must not be called from inside a tokio runtime; `reqwest::blocking` runs
//! its own.

use super::protocol::{self, EmbedRequest, API_KEY_HEADER, APIGW_KEY_HEADER};
use crate::config::{Credentials, EmbeddingModel, EmbeddingsConfig};
use crate::error::{HcxError, Result};
use std::time::Duration;

/// Blocking HyperClovaX embedding client
///
/// Batches are embedded one text at a time, in order.
pub struct BlockingHcxEmbeddingClient {
    http_client: reqwest::blocking::Client,
    credentials: Credentials,
    endpoint: String,
    model: EmbeddingModel,
    dimensions: usize,
}

impl BlockingHcxEmbeddingClient {
    /// Create client from configuration, reading unset credentials from the
    /// environment
    pub fn new(config: EmbeddingsConfig) -> Result<Self> {
        let credentials = config.credentials()?;
        Self::with_credentials(config, credentials)
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(EmbeddingsConfig::from_env())
    }

    pub fn with_credentials(config: EmbeddingsConfig, credentials: Credentials) -> Result<Self> {
        config.validate()?;

        let http_client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HcxError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: config.embedding_url(credentials.app_id()),
            credentials,
            model: config.model,
            dimensions: config.dimensions(),
        })
    }

    /// Generate embedding for single text
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        protocol::validate_text(text)?;
        self.request_embedding(text)
    }

    /// Generate embeddings for a batch; fails as a whole on the first error
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        protocol::validate_batch(texts)?;
        texts
            .iter()
            .map(|text| self.request_embedding(text))
            .collect()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn model(&self) -> EmbeddingModel {
        self.model
    }

    fn request_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, self.credentials.api_key())
            .header(APIGW_KEY_HEADER, self.credentials.apigw_key())
            .json(&EmbedRequest { text })
            .send()?;

        let status = response.status().as_u16();
        let body = response.text()?;

        protocol::parse_response(status, &body, self.dimensions).inspect_err(|e| {
            tracing::warn!("Embedding request failed: {}", e);
        })
    }
}
