//! Error types for Sporre.

use thiserror::Error;

/// Library-level error type for Sporre operations.
#[derive(Error, Debug)]
pub enum SporreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Content is empty")]
    EmptyContent,

    #[error("No chunks created from content")]
    NoChunksProduced,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Ingestion failed while embedding or indexing; the cause is chained.
    #[error("Storage failed: {source}")]
    StorageFailed {
        #[source]
        source: Box<SporreError>,
    },

    /// Question answering failed while embedding, querying, or generating.
    #[error("Query failed: {source}")]
    QueryFailed {
        #[source]
        source: Box<SporreError>,
    },

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    VectorIndex(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Image analysis failed: {0}")]
    Image(String),

    #[error("Document processing failed: {0}")]
    Document(String),

    #[error("Language model error: {0}")]
    Llm(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SporreError {
    /// Wrap an error as a storage failure, preserving the cause chain.
    pub fn storage(source: SporreError) -> Self {
        SporreError::StorageFailed {
            source: Box::new(source),
        }
    }

    /// Wrap an error as a query failure, preserving the cause chain.
    pub fn query(source: SporreError) -> Self {
        SporreError::QueryFailed {
            source: Box::new(source),
        }
    }
}

/// Result type alias for Sporre operations.
pub type Result<T> = std::result::Result<T, SporreError>;
