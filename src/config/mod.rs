//! Configuration module for Sporre.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{
    FinancialPrompts, ImagePrompts, MeetingPrompts, NutritionPrompts, Prompts, QaPrompts,
    SummaryPrompts,
};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, LlmSettings, PromptSettings,
    QaSettings, ServerSettings, Settings, TranscriptionSettings, VectorIndexSettings,
};
