//! Language model abstraction for text and vision prompts.

mod openai;

pub use openai::OpenAIChatModel;

use crate::error::{Result, SporreError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Supported image MIME types for vision prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMediaType {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageMediaType {
    /// The MIME type string declared to the model.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMediaType::Png => "image/png",
            ImageMediaType::Jpeg => "image/jpeg",
            ImageMediaType::Gif => "image/gif",
            ImageMediaType::Webp => "image/webp",
        }
    }

    /// Map a file extension to a media type.
    ///
    /// Unrecognized extensions are rejected rather than coerced to a
    /// default format, so the declared MIME type always matches the bytes.
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Ok(ImageMediaType::Png),
            "jpg" | "jpeg" => Ok(ImageMediaType::Jpeg),
            "gif" => Ok(ImageMediaType::Gif),
            "webp" => Ok(ImageMediaType::Webp),
            other => Err(SporreError::InvalidInput(format!(
                "Unsupported image format: .{}. Supported: .png, .jpg, .jpeg, .gif, .webp",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ImageMediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A base64-encoded image with its declared MIME type.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Base64-encoded image bytes.
    pub base64_data: String,
    /// Declared MIME type.
    pub media_type: ImageMediaType,
}

impl EncodedImage {
    /// Render as a data URL for inlining into a multimodal prompt.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.base64_data)
    }
}

/// Trait for language model providers.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate text from a plain prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text from a prompt with one inlined image.
    async fn generate_with_image(&self, prompt: &str, image: &EncodedImage) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(
            ImageMediaType::from_extension("PNG").unwrap(),
            ImageMediaType::Png
        );
        assert_eq!(
            ImageMediaType::from_extension("jpg").unwrap(),
            ImageMediaType::Jpeg
        );
        assert_eq!(
            ImageMediaType::from_extension("jpeg").unwrap(),
            ImageMediaType::Jpeg
        );
        assert!(matches!(
            ImageMediaType::from_extension("bmp"),
            Err(SporreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_data_url() {
        let image = EncodedImage {
            base64_data: "aGVsbG8=".to_string(),
            media_type: ImageMediaType::Png,
        };
        assert_eq!(image.to_data_url(), "data:image/png;base64,aGVsbG8=");
    }
}
