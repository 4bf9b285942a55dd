//! Embedding clients
//!
//! Provides:
//! - The `Embedder` trait host frameworks depend on
//! - An async client for the CLOVA Studio embedding API
//! - A blocking client with the same contract

mod blocking;
mod client;
pub mod protocol;
mod traits;

pub use blocking::BlockingHcxEmbeddingClient;
pub use client::HcxEmbeddingClient;
pub use traits::*;
