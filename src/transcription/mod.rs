//! Audio transcription via the hosted Whisper API.

mod whisper;

pub use whisper::WhisperTranscriber;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete transcription result with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// Transcribed text.
    pub text: String,
    /// Detected language code (e.g., "en").
    pub language: String,
    /// Audio duration in seconds.
    pub duration_seconds: f64,
}

impl std::fmt::Display for TranscriptionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file to text.
    async fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionResult>;

    /// Transcribe an audio file with a specific language hint.
    async fn transcribe_with_language(
        &self,
        audio_path: &Path,
        language: &str,
    ) -> Result<TranscriptionResult>;
}
