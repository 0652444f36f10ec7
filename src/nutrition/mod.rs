//! Nutrition analysis of food images.

use crate::config::NutritionPrompts;
use crate::error::{Result, SporreError};
use crate::image::ImageService;
use crate::llm::LanguageModel;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Service for nutrition analysis of food items.
pub struct NutritionService {
    llm: Arc<dyn LanguageModel>,
    prompts: NutritionPrompts,
}

impl NutritionService {
    /// Create a new nutrition service.
    pub fn new(llm: Arc<dyn LanguageModel>, prompts: NutritionPrompts) -> Self {
        Self { llm, prompts }
    }

    /// Analyze food items in an image and provide nutritional information.
    ///
    /// The structured nutritionist instructions are always prepended; the
    /// caller prompt (or a default request) follows them.
    #[instrument(skip(self, prompt), fields(image = %path.display()))]
    pub async fn analyze_food_items(&self, path: &Path, prompt: Option<&str>) -> Result<String> {
        let image = ImageService::encode_image(path)?;

        let request = prompt.unwrap_or(&self.prompts.default_request);
        let combined = format!("{} {}", self.prompts.system, request);

        let result = self
            .llm
            .generate_with_image(&combined, &image)
            .await
            .map_err(|e| SporreError::Image(e.to_string()))?;

        info!("Nutrition analysis complete: {} characters", result.len());
        Ok(result)
    }
}
