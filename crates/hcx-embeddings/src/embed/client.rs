//! Async HTTP client for the CLOVA Studio embedding API

use super::protocol::{self, EmbedRequest, API_KEY_HEADER, APIGW_KEY_HEADER};
use super::Embedder;
use crate::config::{Credentials, EmbeddingModel, EmbeddingsConfig};
use crate::error::{HcxError, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// HyperClovaX embedding client
///
/// Holds only immutable state after construction, so one instance can be
/// shared (e.g. behind an `Arc`) by any number of concurrent callers.
pub struct HcxEmbeddingClient {
    http_client: reqwest::Client,
    credentials: Credentials,
    endpoint: String,
    model: EmbeddingModel,
    dimensions: usize,
    max_concurrency: usize,
}

impl HcxEmbeddingClient {
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

    /// Create client with already resolved credentials
    pub fn with_credentials(config: EmbeddingsConfig, credentials: Credentials) -> Result<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HcxError::Config(format!("failed to build HTTP client: {}", e)))?;

        tracing::info!(
            "HyperClovaX embedding client ready (model: {}, stage: {}, dims: {})",
            config.model,
            config.app_stage.path_segment(),
            config.dimensions()
        );

        Ok(Self {
            http_client,
            endpoint: config.embedding_url(credentials.app_id()),
            credentials,
            model: config.model,
            dimensions: config.dimensions(),
            max_concurrency: config.max_concurrency,
        })
    }

    /// Configured embedding model
    pub fn model(&self) -> EmbeddingModel {
        self.model
    }

    /// Embed a text, giving up with a cancelled transport error once `token`
    /// fires
    pub async fn embed_cancellable(
        &self,
        text: &str,
        token: &CancellationToken,
    ) -> Result<Vec<f32>> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("Embedding request cancelled");
                Err(HcxError::cancelled())
            }
            result = self.embed(text) => result,
        }
    }

    /// Embed a batch, abandoning all outstanding requests once `token` fires
    pub async fn embed_batch_cancellable(
        &self,
        texts: &[String],
        token: &CancellationToken,
    ) -> Result<Vec<Vec<f32>>> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("Embedding batch of {} cancelled", texts.len());
                Err(HcxError::cancelled())
            }
            result = self.embed_batch(texts) => result,
        }
    }

    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, self.credentials.api_key())
            .header(APIGW_KEY_HEADER, self.credentials.apigw_key())
            .json(&EmbedRequest { text })
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        let result = protocol::parse_response(status, &body, self.dimensions);
        match &result {
            Ok(_) => tracing::debug!(
                "Embedded {} chars in {}ms",
                text.chars().count(),
                start.elapsed().as_millis()
            ),
            Err(e) => tracing::warn!("Embedding request failed: {}", e),
        }
        result
    }
}

#[async_trait]
impl Embedder for HcxEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        protocol::validate_text(text)?;
        self.request_embedding(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        protocol::validate_batch(texts)?;

        tracing::debug!(
            "Embedding {} texts ({} concurrent)",
            texts.len(),
            self.max_concurrency
        );

        // Requests are created before entering the stream so the boxed trait
        // future stays `Send`. `buffered` yields in input order; the first
        // error ends the stream and drops the requests still in flight.
        let requests: Vec<_> = texts
            .iter()
            .map(|text| self.request_embedding(text))
            .collect();
        let embeddings: Vec<Vec<f32>> = stream::iter(requests)
            .buffered(self.max_concurrency)
            .try_collect()
            .await?;

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        self.model.as_str()
    }
}
