//! HyperClovaX Embeddings
//!
//! Text embedding client for the Naver HyperClovaX (CLOVA Studio) embedding
//! API, for use inside LLM orchestration frameworks.
//!
//! # Features
//! - `Embedder` trait implemented by an async client
//! - Blocking client for synchronous hosts
//! - Credentials from explicit config, YAML file, or environment
//! - Distinguishable configuration, transport, and remote errors
//!
//! ```no_run
//! use hcx_embeddings::{Embedder, EmbeddingsConfig, HcxEmbeddingClient};
//!
//! # async fn run() -> hcx_embeddings::Result<()> {
//! // Reads NCP_CLOVASTUDIO_API_KEY, NCP_APIGW_API_KEY and NCP_EMB_APP_ID
//! let client = HcxEmbeddingClient::new(EmbeddingsConfig::default())?;
//! let vector = client.embed("hello world").await?;
//! assert_eq!(vector.len(), client.dimensions());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod embed;
pub mod error;

pub use config::{
    AppStage, Credentials, EmbeddingModel, EmbeddingsConfig, SecretString, API_KEY_ENV,
    APIGW_KEY_ENV, APP_ID_ENV, DEFAULT_API_BASE,
};
pub use embed::{BlockingHcxEmbeddingClient, Embedder, HcxEmbeddingClient};
pub use error::{Error, HcxError, Result, TransportKind};

/// Re-exported so callers can cancel in-flight requests without a direct
/// tokio-util dependency
pub use tokio_util::sync::CancellationToken;

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "hcx-embeddings";
