//! Analyze command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::image::ImageService;
use crate::llm::OpenAIChatModel;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// Run the analyze command.
pub async fn run_analyze(
    image: &str,
    prompt: Option<String>,
    extract_text: bool,
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
    let service = ImageService::new(llm, prompts.image);

    let spinner = Output::spinner("Analyzing image...");

    let result = if extract_text {
        service.extract_text(Path::new(image)).await
    } else {
        service.analyze(Path::new(image), prompt.as_deref()).await
    };

    match result {
        Ok(analysis) => {
            spinner.finish_and_clear();
            println!("\n{}", analysis);
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Image analysis failed: {}", e));
            Err(e.into())
        }
    }
}
