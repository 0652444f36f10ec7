//! OpenAI Whisper transcription implementation.

use super::{Transcriber, TranscriptionResult};
use crate::error::{Result, SporreError};
use crate::openai::create_client;
use async_openai::types::{AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info, instrument};

/// OpenAI Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl WhisperTranscriber {
    /// Create a new Whisper transcriber with the default model.
    pub fn new() -> Self {
        Self::with_model("whisper-1")
    }

    /// Create a new Whisper transcriber with a custom model.
    pub fn with_model(model: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
        }
    }

    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe_file(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<TranscriptionResult> {
        if !audio_path.exists() {
            return Err(SporreError::InvalidInput(format!(
                "Audio file not found: {}",
                audio_path.display()
            )));
        }

        debug!("Transcribing audio file");
        let file_bytes = tokio::fs::read(audio_path).await?;

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(async_openai::types::AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.mp3")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .response_format(AudioResponseFormat::VerboseJson);

        if let Some(lang) = language {
            request_builder.language(lang);
        }

        let request = request_builder
            .build()
            .map_err(|e| SporreError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe_verbose_json(request)
            .await
            .map_err(|e| SporreError::ProviderUnavailable(format!("Whisper API error: {}", e)))?;

        let result = TranscriptionResult {
            text: response.text.trim().to_string(),
            language: response.language,
            duration_seconds: response.duration as f64,
        };

        info!(
            "Transcription complete: {} characters, language {}",
            result.text.len(),
            result.language
        );
        Ok(result)
    }
}

impl Default for WhisperTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionResult> {
        self.transcribe_file(audio_path, None).await
    }

    async fn transcribe_with_language(
        &self,
        audio_path: &Path,
        language: &str,
    ) -> Result<TranscriptionResult> {
        self.transcribe_file(audio_path, Some(language)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_invalid_input() {
        let transcriber = WhisperTranscriber::new();
        let err = transcriber
            .transcribe(Path::new("/nonexistent/audio.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, SporreError::InvalidInput(_)));
    }
}
