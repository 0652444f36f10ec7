//! Webpage question answering backed by the vector index.
//!
//! Ingests a document as overlapping chunks with embeddings, then answers
//! questions by retrieving the nearest chunks for one session and prompting
//! the language model with them.

mod service;

pub use service::QaService;

use serde::{Deserialize, Serialize};

/// Fixed answer returned when retrieval finds nothing relevant. The language
/// model is not called in that case.
pub const NO_MATCH_FALLBACK: &str =
    "I couldn't find relevant information to answer your question.";

/// Request to store a document for question answering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRequest {
    /// Document title.
    pub title: String,
    /// Document URL.
    pub url: String,
    /// Full document text, already combined into one string.
    pub content: String,
    /// Extra metadata copied onto the session and every chunk.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// Chunk size override; the configured default applies if None.
    #[serde(default)]
    pub chunk_size: Option<usize>,
    /// Chunk overlap override; the configured default applies if None.
    #[serde(default)]
    pub chunk_overlap: Option<usize>,
}

impl StoreRequest {
    /// Create a request with default chunking and no extra metadata.
    pub fn new(title: impl Into<String>, url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            metadata: serde_json::Map::new(),
            chunk_size: None,
            chunk_overlap: None,
        }
    }
}

/// Outcome of a session deletion.
///
/// Index deletion is attempted before the session record is removed. If the
/// index call fails the session record is kept, so the index and the session
/// table can disagree until a later delete succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Index entries and session record removed.
    Deleted,
    /// Index deletion failed; the session record was retained.
    IndexDeleteFailed,
    /// No session with that id.
    NotFound,
}
