//! In-memory vector index implementation.
//!
//! Useful for testing and small datasets.

use super::{cosine_similarity, IndexEntry, ScoredEntry, VectorIndex};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory vector index.
pub struct MemoryVectorIndex {
    entries: RwLock<HashMap<String, IndexEntry>>,
}

impl MemoryVectorIndex {
    /// Create a new in-memory vector index.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn upsert(&self, entries: &[IndexEntry]) -> Result<usize> {
        let mut store = self.entries.write().unwrap();
        for entry in entries {
            store.insert(entry.id.clone(), entry.clone());
        }
        Ok(entries.len())
    }

    async fn query(
        &self,
        embedding: &[f32],
        top_k: usize,
        session_id: &str,
    ) -> Result<Vec<ScoredEntry>> {
        let entries = self.entries.read().unwrap();

        let mut results: Vec<ScoredEntry> = entries
            .values()
            .filter(|e| e.metadata.session_id == session_id)
            .map(|e| ScoredEntry {
                document: e.document.clone(),
                metadata: e.metadata.clone(),
                score: cosine_similarity(embedding, &e.embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);

        Ok(results)
    }

    async fn delete_session(&self, session_id: &str) -> Result<usize> {
        let mut entries = self.entries.write().unwrap();
        let initial_len = entries.len();
        entries.retain(|_, e| e.metadata.session_id != session_id);
        Ok(initial_len - entries.len())
    }

    async fn entry_count(&self) -> Result<usize> {
        let entries = self.entries.read().unwrap();
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_entry;
    use super::*;

    #[tokio::test]
    async fn test_upsert_and_query() {
        let index = MemoryVectorIndex::new();

        index
            .upsert(&[
                test_entry("session-a", 0, vec![1.0, 0.0, 0.0]),
                test_entry("session-a", 1, vec![0.0, 1.0, 0.0]),
            ])
            .await
            .unwrap();

        assert_eq!(index.entry_count().await.unwrap(), 2);

        let results = index.query(&[1.0, 0.0, 0.0], 10, "session-a").await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);
        assert_eq!(results[0].metadata.chunk_index, 0);
    }

    #[tokio::test]
    async fn test_query_filters_by_session() {
        let index = MemoryVectorIndex::new();

        index
            .upsert(&[
                test_entry("session-a", 0, vec![1.0, 0.0, 0.0]),
                test_entry("session-b", 0, vec![1.0, 0.0, 0.0]),
            ])
            .await
            .unwrap();

        let results = index.query(&[1.0, 0.0, 0.0], 10, "session-a").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].metadata.session_id, "session-a");

        let results = index.query(&[1.0, 0.0, 0.0], 10, "missing").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_overwrites_by_id() {
        let index = MemoryVectorIndex::new();

        let entry = test_entry("session-a", 0, vec![1.0, 0.0, 0.0]);
        index.upsert(std::slice::from_ref(&entry)).await.unwrap();
        index.upsert(&[entry]).await.unwrap();

        assert_eq!(index.entry_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let index = MemoryVectorIndex::new();

        index
            .upsert(&[
                test_entry("session-a", 0, vec![1.0, 0.0, 0.0]),
                test_entry("session-a", 1, vec![0.0, 1.0, 0.0]),
                test_entry("session-b", 0, vec![0.0, 0.0, 1.0]),
            ])
            .await
            .unwrap();

        let deleted = index.delete_session("session-a").await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(index.entry_count().await.unwrap(), 1);

        let deleted = index.delete_session("session-a").await.unwrap();
        assert_eq!(deleted, 0);
    }
}
