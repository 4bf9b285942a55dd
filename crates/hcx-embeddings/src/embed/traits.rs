//! Embedding trait definitions

use crate::error::Result;
#[cfg(doc)]
use crate::error::HcxError;
use async_trait::async_trait;

/// Embedding generation trait
///
/// This is the capability an orchestration framework depends on. Implementors
/// must be shareable across tasks.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embedding for single text
    ///
    /// Empty text is rejected with [`HcxError::InvalidInput`] before any
    /// request is sent. Whitespace-only text is embedded like any other.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for batch of texts, one per input, in input order
    ///
    /// An empty batch, or any empty text in it, is [`HcxError::InvalidInput`]
    /// and nothing is sent. The call is all or nothing: if one text fails the
    /// whole batch returns that error and no partial result.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Get model name
    fn model_name(&self) -> &str;
}
