//! Embedding generation for semantic search and retrieval.

mod openai;

pub use openai::OpenAIEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding generation.
///
/// Documents and queries must share one model and dimensionality for the
/// lifetime of the instance; similarity scores are only meaningful within a
/// single embedding space.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embeddings for multiple texts, one vector per input, in
    /// input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate an embedding for a single query.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}
