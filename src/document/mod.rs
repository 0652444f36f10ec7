//! Document processing: meeting minutes, financial formatting, summarization.

use crate::config::Prompts;
use crate::error::{Result, SporreError};
use crate::llm::LanguageModel;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Service for transcript and document processing.
pub struct DocumentService {
    llm: Arc<dyn LanguageModel>,
    prompts: Prompts,
}

impl DocumentService {
    /// Create a new document service.
    pub fn new(llm: Arc<dyn LanguageModel>, prompts: Prompts) -> Self {
        Self { llm, prompts }
    }

    /// Generate meeting minutes and a task list from a transcript.
    #[instrument(skip(self, transcript))]
    pub async fn generate_meeting_minutes(&self, transcript: &str) -> Result<String> {
        if transcript.trim().is_empty() {
            return Err(SporreError::EmptyContent);
        }

        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), transcript.to_string());
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.meeting.template, &vars);

        let result = self
            .llm
            .generate(&prompt)
            .await
            .map_err(|e| SporreError::Document(e.to_string()))?;

        info!("Generated {} characters of meeting notes", result.len());
        Ok(result)
    }

    /// Format financial terminology in a transcript.
    ///
    /// Expands acronyms like '401k' to '401(k) retirement savings plan'.
    #[instrument(skip(self, transcript))]
    pub async fn format_financial_transcript(&self, transcript: &str) -> Result<String> {
        if transcript.trim().is_empty() {
            return Err(SporreError::EmptyContent);
        }

        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), transcript.to_string());
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.financial.template, &vars);

        let result = self
            .llm
            .generate(&prompt)
            .await
            .map_err(|e| SporreError::Document(e.to_string()))?;

        info!("Formatted {} characters", result.len());
        Ok(result)
    }

    /// Summarize a long text document.
    #[instrument(skip(self, text))]
    pub async fn summarize(&self, text: &str, max_words: Option<usize>) -> Result<String> {
        if text.trim().is_empty() {
            return Err(SporreError::EmptyContent);
        }

        let length_instruction = max_words
            .map(|n| format!(" Keep the summary under {} words.", n))
            .unwrap_or_default();

        let mut vars = HashMap::new();
        vars.insert("text".to_string(), text.to_string());
        vars.insert("length_instruction".to_string(), length_instruction);
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.summary.template, &vars);

        let result = self
            .llm
            .generate(&prompt)
            .await
            .map_err(|e| SporreError::Document(e.to_string()))?;

        info!("Created summary: {} characters", result.len());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::EncodedImage;
    use async_trait::async_trait;

    struct EchoModel;

    #[async_trait]
    impl LanguageModel for EchoModel {
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }

        async fn generate_with_image(
            &self,
            prompt: &str,
            _image: &EncodedImage,
        ) -> Result<String> {
            Ok(prompt.to_string())
        }
    }

    fn service() -> DocumentService {
        DocumentService::new(Arc::new(EchoModel), Prompts::default())
    }

    #[tokio::test]
    async fn test_meeting_minutes_prompt() {
        let result = service()
            .generate_meeting_minutes("Sarah presented the Q1 plan.")
            .await
            .unwrap();
        assert!(result.contains("## Meeting Minutes"));
        assert!(result.contains("Sarah presented the Q1 plan."));
    }

    #[tokio::test]
    async fn test_empty_transcript_rejected() {
        let err = service().generate_meeting_minutes("   ").await.unwrap_err();
        assert!(matches!(err, SporreError::EmptyContent));

        let err = service().format_financial_transcript("").await.unwrap_err();
        assert!(matches!(err, SporreError::EmptyContent));
    }

    #[tokio::test]
    async fn test_financial_prompt() {
        let result = service()
            .format_financial_transcript("Our ROA improved and the 401k business grew.")
            .await
            .unwrap();
        assert!(result.contains("financial products"));
        assert!(result.contains("Our ROA improved"));
    }

    #[tokio::test]
    async fn test_summarize_length_instruction() {
        let with_limit = service().summarize("Long text here.", Some(50)).await.unwrap();
        assert!(with_limit.contains("under 50 words"));

        let without_limit = service().summarize("Long text here.", None).await.unwrap();
        assert!(!without_limit.contains("under"));
    }
}
