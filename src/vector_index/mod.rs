//! Vector index abstraction for Sporre.
//!
//! Provides a trait-based interface for different vector index backends.
//! Entries are grouped by session; queries are always filtered to a single
//! session so ingested documents stay isolated from each other.

mod memory;
mod sqlite;

pub use memory::MemoryVectorIndex;
pub use sqlite::SqliteVectorIndex;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata attached to every indexed chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Session this chunk belongs to.
    pub session_id: String,
    /// Source document title.
    pub title: String,
    /// Source document URL.
    pub url: String,
    /// 0-based position among this session's chunks.
    pub chunk_index: usize,
    /// Chunk count snapshot at store time.
    pub total_chunks: usize,
    /// When this chunk was stored.
    pub stored_at: DateTime<Utc>,
    /// Caller-supplied extra metadata, copied onto every chunk.
    #[serde(default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A single entry in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Unique entry id, `"{session_id}_{chunk_index}"`.
    pub id: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// Chunk text.
    pub document: String,
    /// Chunk metadata.
    pub metadata: ChunkMetadata,
}

impl IndexEntry {
    /// Build the entry id for a chunk of a session.
    pub fn entry_id(session_id: &str, chunk_index: usize) -> String {
        format!("{}_{}", session_id, chunk_index)
    }
}

/// A query match with its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    /// Matched chunk text.
    pub document: String,
    /// Matched chunk metadata.
    pub metadata: ChunkMetadata,
    /// Cosine similarity to the query (higher is better).
    pub score: f32,
}

/// Trait for vector index implementations.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert entries as a single batch keyed by id. An entry whose id
    /// already exists is overwritten. Returns the number of entries written.
    async fn upsert(&self, entries: &[IndexEntry]) -> Result<usize>;

    /// Return up to `top_k` entries nearest to `embedding`, restricted to
    /// entries whose metadata names `session_id`, ordered by descending
    /// similarity.
    async fn query(
        &self,
        embedding: &[f32],
        top_k: usize,
        session_id: &str,
    ) -> Result<Vec<ScoredEntry>>;

    /// Delete all entries belonging to a session. Returns the number removed.
    async fn delete_session(&self, session_id: &str) -> Result<usize>;

    /// Get total entry count.
    async fn entry_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
pub(crate) fn test_entry(session_id: &str, chunk_index: usize, embedding: Vec<f32>) -> IndexEntry {
    IndexEntry {
        id: IndexEntry::entry_id(session_id, chunk_index),
        embedding,
        document: format!("chunk {} of {}", chunk_index, session_id),
        metadata: ChunkMetadata {
            session_id: session_id.to_string(),
            title: "Test Page".to_string(),
            url: "https://example.com".to_string(),
            chunk_index,
            total_chunks: 1,
            stored_at: Utc::now(),
            extra: serde_json::Map::new(),
        },
    }
}
