//! Nutrition command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::llm::OpenAIChatModel;
use crate::nutrition::NutritionService;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// Run the nutrition command.
pub async fn run_nutrition(
    image: &str,
    prompt: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Vision) {
        Output::error(&format!("{}", e));
        Output::info("Run 'sporre doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let llm = Arc::new(OpenAIChatModel::with_config(
        &settings.llm.model,
        settings.llm.temperature,
        settings.llm.max_tokens,
    ));
    let service = NutritionService::new(llm, prompts.nutrition);

    let spinner = Output::spinner("Analyzing food items...");

    match service
        .analyze_food_items(Path::new(image), prompt.as_deref())
        .await
    {
        Ok(analysis) => {
            spinner.finish_and_clear();
            println!("\n{}", analysis);
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Nutrition analysis failed: {}", e));
            Err(e.into())
        }
    }
}
