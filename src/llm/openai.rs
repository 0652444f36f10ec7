//! OpenAI chat completions implementation.

use super::{EncodedImage, LanguageModel};
use crate::error::{Result, SporreError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, ImageDetail, ImageUrlArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// OpenAI chat-completions language model.
pub struct OpenAIChatModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIChatModel {
    /// Create a new chat model with default settings.
    pub fn new() -> Self {
        Self::with_config("gpt-4o-mini", 0.7, 1024)
    }

    /// Create a new chat model with custom model and sampling parameters.
    pub fn with_config(model: &str, temperature: f32, max_tokens: u32) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            temperature,
            max_tokens,
        }
    }

    async fn complete(&self, messages: Vec<ChatCompletionRequestMessage>) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| SporreError::Llm(format!("Failed to build request: {}", e)))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            SporreError::ProviderUnavailable(format!("Chat API error: {}", e))
        })?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| SporreError::Llm("Empty response from model".to_string()))?
            .clone();

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }
}

impl Default for OpenAIChatModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageModel for OpenAIChatModel {
    #[instrument(skip(self, prompt))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| SporreError::Llm(e.to_string()))?
                .into(),
        ];

        self.complete(messages).await
    }

    #[instrument(skip(self, prompt, image), fields(media_type = %image.media_type))]
    async fn generate_with_image(&self, prompt: &str, image: &EncodedImage) -> Result<String> {
        let text_part = ChatCompletionRequestMessageContentPartTextArgs::default()
            .text(prompt)
            .build()
            .map_err(|e| SporreError::Llm(e.to_string()))?;

        let image_part = ChatCompletionRequestMessageContentPartImageArgs::default()
            .image_url(
                ImageUrlArgs::default()
                    .url(image.to_data_url())
                    .detail(ImageDetail::Auto)
                    .build()
                    .map_err(|e| SporreError::Llm(e.to_string()))?,
            )
            .build()
            .map_err(|e| SporreError::Llm(e.to_string()))?;

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(vec![text_part.into(), image_part.into()])
                .build()
                .map_err(|e| SporreError::Llm(e.to_string()))?
                .into(),
        ];

        self.complete(messages).await
    }
}
