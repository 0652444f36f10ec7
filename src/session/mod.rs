//! Session bookkeeping for ingested documents.
//!
//! A session records the metadata of one stored document. Sessions live in
//! process memory for the life of the process and are not persisted across
//! restarts; the vector index is the durable store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Metadata for one ingested document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session id, generated at ingestion time.
    pub id: String,
    /// Document title.
    pub title: String,
    /// Document URL.
    pub url: String,
    /// Number of chunks stored for this session.
    pub chunk_count: usize,
    /// Character count of the trimmed source text.
    pub content_length: usize,
    /// Chunk size used for this session.
    pub chunk_size: usize,
    /// Chunk overlap used for this session.
    pub chunk_overlap: usize,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Caller-supplied extra metadata.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Lock-guarded table of active sessions.
///
/// Store, ask, and delete all read-modify-write this table, so access goes
/// through a single RwLock rather than ambient global state.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    /// Create an empty session store.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Record a session, replacing any existing record with the same id.
    pub fn insert(&self, session: Session) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session.id.clone(), session);
    }

    /// Look up a session by id.
    pub fn get(&self, id: &str) -> Option<Session> {
        let sessions = self.sessions.read().unwrap();
        sessions.get(id).cloned()
    }

    /// Check whether a session exists.
    pub fn contains(&self, id: &str) -> bool {
        let sessions = self.sessions.read().unwrap();
        sessions.contains_key(id)
    }

    /// Remove a session, returning it if present.
    pub fn remove(&self, id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.remove(id)
    }

    /// List all sessions, oldest first.
    pub fn list(&self) -> Vec<Session> {
        let sessions = self.sessions.read().unwrap();
        let mut all: Vec<Session> = sessions.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        all
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        let sessions = self.sessions.read().unwrap();
        sessions.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
