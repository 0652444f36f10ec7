//! Image analysis and text extraction via the vision-capable language model.

use crate::config::ImagePrompts;
use crate::error::{Result, SporreError};
use crate::llm::{EncodedImage, ImageMediaType, LanguageModel};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Service for image analysis.
pub struct ImageService {
    llm: Arc<dyn LanguageModel>,
    prompts: ImagePrompts,
}

impl ImageService {
    /// Create a new image service.
    pub fn new(llm: Arc<dyn LanguageModel>, prompts: ImagePrompts) -> Self {
        Self { llm, prompts }
    }

    /// Read an image file and encode it for the model.
    ///
    /// The MIME type is taken from the file extension; unsupported
    /// extensions are rejected rather than coerced to a default format.
    pub fn encode_image(path: &Path) -> Result<EncodedImage> {
        if !path.exists() {
            return Err(SporreError::InvalidInput(format!(
                "Image file not found: {}",
                path.display()
            )));
        }

        let media_type = media_type_for_path(path)?;

        let bytes = std::fs::read(path)
            .map_err(|e| SporreError::Image(format!("Failed to read image: {}", e)))?;

        Ok(EncodedImage {
            base64_data: STANDARD.encode(bytes),
            media_type,
        })
    }

    /// Analyze an image and extract information.
    ///
    /// Uses the default describe-and-extract prompt when the caller
    /// provides none.
    #[instrument(skip(self, prompt), fields(image = %path.display()))]
    pub async fn analyze(&self, path: &Path, prompt: Option<&str>) -> Result<String> {
        let image = Self::encode_image(path)?;
        debug!("Encoded image as {}", image.media_type);

        let prompt = prompt.unwrap_or(&self.prompts.analysis_default);

        let result = self
            .llm
            .generate_with_image(prompt, &image)
            .await
            .map_err(|e| SporreError::Image(e.to_string()))?;

        info!("Analysis complete: {} characters", result.len());
        Ok(result)
    }

    /// Extract text from an image (OCR).
    pub async fn extract_text(&self, path: &Path) -> Result<String> {
        let prompt = self.prompts.text_extraction.clone();
        self.analyze(path, Some(&prompt)).await
    }
}

/// Map a file's extension to a supported image media type.
pub fn media_type_for_path(path: &Path) -> Result<ImageMediaType> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| {
            SporreError::InvalidInput(format!(
                "Image file has no extension: {}",
                path.display()
            ))
        })?;

    ImageMediaType::from_extension(ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io::Write;

    struct EchoModel;

    #[async_trait]
    impl LanguageModel for EchoModel {
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }

        async fn generate_with_image(
            &self,
            prompt: &str,
            image: &EncodedImage,
        ) -> Result<String> {
            Ok(format!("{}|{}", prompt, image.media_type))
        }
    }

    fn write_temp_image(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"not a real image, but bytes are bytes").unwrap();
        path
    }

    #[test]
    fn test_media_type_for_path() {
        assert_eq!(
            media_type_for_path(Path::new("photo.JPG")).unwrap(),
            ImageMediaType::Jpeg
        );
        assert!(matches!(
            media_type_for_path(Path::new("diagram.tiff")),
            Err(SporreError::InvalidInput(_))
        ));
        assert!(matches!(
            media_type_for_path(Path::new("no_extension")),
            Err(SporreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_encode_image_missing_file() {
        let err = ImageService::encode_image(Path::new("/nonexistent/pic.png")).unwrap_err();
        assert!(matches!(err, SporreError::InvalidInput(_)));
    }

    #[test]
    fn test_encode_image_round_trips_base64() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp_image(&dir, "pic.png");

        let encoded = ImageService::encode_image(&path).unwrap();
        assert_eq!(encoded.media_type, ImageMediaType::Png);

        let decoded = STANDARD.decode(&encoded.base64_data).unwrap();
        assert_eq!(decoded, b"not a real image, but bytes are bytes");
    }

    #[tokio::test]
    async fn test_analyze_uses_default_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp_image(&dir, "pic.webp");

        let service = ImageService::new(Arc::new(EchoModel), ImagePrompts::default());
        let result = service.analyze(&path, None).await.unwrap();
        assert!(result.contains("Describe what you see"));
        assert!(result.ends_with("image/webp"));
    }

    #[tokio::test]
    async fn test_extract_text_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp_image(&dir, "scan.jpeg");

        let service = ImageService::new(Arc::new(EchoModel), ImagePrompts::default());
        let result = service.extract_text(&path).await.unwrap();
        assert!(result.contains("extract all text"));
    }
}
