//! SQLite-based vector index implementation.
//!
//! Uses SQLite with cosine similarity computed in Rust for simplicity.
//! For production use cases with large datasets, consider using the
//! sqlite-vec extension or a dedicated vector database.

use super::{cosine_similarity, ChunkMetadata, IndexEntry, ScoredEntry, VectorIndex};
use crate::error::{Result, SporreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
    id TEXT PRIMARY KEY,
    session_id TEXT NOT NULL,
    title TEXT NOT NULL,
    url TEXT NOT NULL,
    chunk_index INTEGER NOT NULL,
    total_chunks INTEGER NOT NULL,
    document TEXT NOT NULL,
    embedding BLOB NOT NULL,
    stored_at TEXT NOT NULL,
    extra_json TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_entries_session_id ON entries(session_id);
"#;

/// SQLite-based vector index.
pub struct SqliteVectorIndex {
    conn: Mutex<Connection>,
}

impl SqliteVectorIndex {
    /// Create a new SQLite vector index.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector index at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector index (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<IndexEntry> {
        let embedding_bytes: Vec<u8> = row.get(7)?;
        let stored_at_str: String = row.get(8)?;
        let extra_json: String = row.get(9)?;

        Ok(IndexEntry {
            id: row.get(0)?,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            document: row.get(6)?,
            metadata: ChunkMetadata {
                session_id: row.get(1)?,
                title: row.get(2)?,
                url: row.get(3)?,
                chunk_index: row.get::<_, i64>(4)? as usize,
                total_chunks: row.get::<_, i64>(5)? as usize,
                stored_at: DateTime::parse_from_rfc3339(&stored_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
                extra: serde_json::from_str(&extra_json).unwrap_or_default(),
            },
        })
    }
}

#[async_trait]
impl VectorIndex for SqliteVectorIndex {
    #[instrument(skip(self, entries))]
    async fn upsert(&self, entries: &[IndexEntry]) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SporreError::VectorIndex(format!("Failed to acquire lock: {}", e)))?;

        let tx = conn.unchecked_transaction()?;

        for entry in entries {
            let embedding_bytes = Self::embedding_to_bytes(&entry.embedding);
            let extra_json = serde_json::to_string(&entry.metadata.extra)?;

            tx.execute(
                r#"
                INSERT OR REPLACE INTO entries
                (id, session_id, title, url, chunk_index, total_chunks, document,
                 embedding, stored_at, extra_json)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
                params![
                    entry.id,
                    entry.metadata.session_id,
                    entry.metadata.title,
                    entry.metadata.url,
                    entry.metadata.chunk_index as i64,
                    entry.metadata.total_chunks as i64,
                    entry.document,
                    embedding_bytes,
                    entry.metadata.stored_at.to_rfc3339(),
                    extra_json,
                ],
            )?;
        }

        tx.commit()?;
        info!("Batch upserted {} entries", entries.len());
        Ok(entries.len())
    }

    #[instrument(skip(self, embedding))]
    async fn query(
        &self,
        embedding: &[f32],
        top_k: usize,
        session_id: &str,
    ) -> Result<Vec<ScoredEntry>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SporreError::VectorIndex(format!("Failed to acquire lock: {}", e)))?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, session_id, title, url, chunk_index, total_chunks, document,
                   embedding, stored_at, extra_json
            FROM entries
            WHERE session_id = ?1
            "#,
        )?;

        let entries = stmt.query_map(params![session_id], Self::row_to_entry)?;

        let mut results: Vec<ScoredEntry> = entries
            .filter_map(|entry| entry.ok())
            .map(|e| ScoredEntry {
                score: cosine_similarity(embedding, &e.embedding),
                document: e.document,
                metadata: e.metadata,
            })
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);

        debug!("Found {} matching entries", results.len());
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn delete_session(&self, session_id: &str) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SporreError::VectorIndex(format!("Failed to acquire lock: {}", e)))?;

        let deleted = conn.execute(
            "DELETE FROM entries WHERE session_id = ?1",
            params![session_id],
        )?;

        info!("Deleted {} entries for session {}", deleted, session_id);
        Ok(deleted)
    }

    async fn entry_count(&self) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SporreError::VectorIndex(format!("Failed to acquire lock: {}", e)))?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_entry;
    use super::*;

    #[tokio::test]
    async fn test_sqlite_vector_index() {
        let index = SqliteVectorIndex::in_memory().unwrap();

        index
            .upsert(&[
                test_entry("session-a", 0, vec![1.0, 0.0, 0.0]),
                test_entry("session-a", 1, vec![0.0, 1.0, 0.0]),
                test_entry("session-b", 0, vec![1.0, 0.0, 0.0]),
            ])
            .await
            .unwrap();

        assert_eq!(index.entry_count().await.unwrap(), 3);

        let results = index.query(&[1.0, 0.0, 0.0], 10, "session-a").await.unwrap();
        assert_eq!(results.len(), 2);
        assert!((results[0].score - 1.0).abs() < 0.001);
        assert_eq!(results[0].metadata.session_id, "session-a");

        let deleted = index.delete_session("session-a").await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(index.entry_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reinsert_same_id_overwrites() {
        let index = SqliteVectorIndex::in_memory().unwrap();

        let mut entry = test_entry("session-a", 0, vec![1.0, 0.0]);
        index.upsert(std::slice::from_ref(&entry)).await.unwrap();

        entry.document = "updated".to_string();
        index.upsert(&[entry]).await.unwrap();

        assert_eq!(index.entry_count().await.unwrap(), 1);
        let results = index.query(&[1.0, 0.0], 1, "session-a").await.unwrap();
        assert_eq!(results[0].document, "updated");
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.db");

        {
            let index = SqliteVectorIndex::new(&path).unwrap();
            index
                .upsert(&[test_entry("session-a", 0, vec![0.5, 0.5])])
                .await
                .unwrap();
        }

        let reopened = SqliteVectorIndex::new(&path).unwrap();
        assert_eq!(reopened.entry_count().await.unwrap(), 1);

        let results = reopened.query(&[0.5, 0.5], 1, "session-a").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].metadata.chunk_index, 0);
    }
}
