// Embed command-line arguments with HyperClovaX
//
// Usage: cargo run --example embed -- "first text" "second text"
//
// Credentials come from NCP_CLOVASTUDIO_API_KEY, NCP_APIGW_API_KEY and
// NCP_EMB_APP_ID, optionally via a .env file.

use anyhow::{bail, Result};
use hcx_embeddings::{Embedder, EmbeddingsConfig, HcxEmbeddingClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "hcx_embeddings=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let texts: Vec<String> = std::env::args().skip(1).collect();
    if texts.is_empty() {
        bail!("usage: embed <text>...");
    }

    let config = EmbeddingsConfig::load()?;
    let client = HcxEmbeddingClient::new(config)?;

    let embeddings = client.embed_batch(&texts).await?;
    for (text, embedding) in texts.iter().zip(&embeddings) {
        let preview: Vec<String> = embedding.iter().take(4).map(|v| format!("{:.4}", v)).collect();
        println!(
            "{} ({} dims): [{}, ...]",
            text,
            embedding.len(),
            preview.join(", ")
        );
    }

    Ok(())
}
