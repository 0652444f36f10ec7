//! Configuration settings for Sporre.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub embedding: EmbeddingSettings,
    pub chunking: ChunkingSettings,
    pub vector_index: VectorIndexSettings,
    pub qa: QaSettings,
    pub transcription: TranscriptionSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.sporre".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat model for generation.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens per response.
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding provider (openai).
    pub provider: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Content chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Chunk size in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters.
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: crate::chunking::DEFAULT_CHUNK_SIZE,
            chunk_overlap: crate::chunking::DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorIndexSettings {
    /// Vector index provider (sqlite, memory).
    pub provider: String,
    /// Path to SQLite database (for sqlite provider).
    pub sqlite_path: String,
}

impl Default for VectorIndexSettings {
    fn default() -> Self {
        Self {
            provider: "sqlite".to_string(),
            sqlite_path: "~/.sporre/vectors.db".to_string(),
        }
    }
}

/// Question answering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaSettings {
    /// Number of relevant chunks to retrieve per question.
    pub top_k: usize,
}

impl Default for QaSettings {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// Transcription settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Transcription model to use.
    pub model: String,
    /// Language hint (ISO 639-1 code), or None for auto-detect.
    pub language: Option<String>,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            language: Some("en".to_string()),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5500,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SporreError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sporre")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded SQLite database path.
    pub fn sqlite_path(&self) -> PathBuf {
        Self::expand_path(&self.vector_index.sqlite_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.chunk_size, 1000);
        assert_eq!(settings.chunking.chunk_overlap, 200);
        assert_eq!(settings.qa.top_k, 3);
        assert_eq!(settings.embedding.dimensions, 1536);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [chunking]
            chunk_size = 500
            "#,
        )
        .unwrap();
        assert_eq!(settings.chunking.chunk_size, 500);
        assert_eq!(settings.chunking.chunk_overlap, 200);
        assert_eq!(settings.llm.model, "gpt-4o-mini");
    }
}
