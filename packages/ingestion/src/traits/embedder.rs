//! Embedding provider trait.

use async_trait::async_trait;

use crate::error::EmbedError;

/// Computes embedding vectors via an external provider.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single chunk of text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}
