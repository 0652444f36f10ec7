//! Document processing commands: minutes, financial, summarize.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::document::DocumentService;
use crate::llm::OpenAIChatModel;
use anyhow::Result;
use std::sync::Arc;

fn build_service(settings: &Settings) -> Result<DocumentService> {
    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let llm = Arc::new(OpenAIChatModel::with_config(
        &settings.llm.model,
        settings.llm.temperature,
        settings.llm.max_tokens,
    ));
    Ok(DocumentService::new(llm, prompts))
}

fn write_result(result: &str, output: Option<String>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, result)?;
            Output::info(&format!("Written to {}", path));
        }
        None => println!("\n{}", result),
    }
    Ok(())
}

/// Run the minutes command.
pub async fn run_minutes(file: &str, output: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Document) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let transcript = std::fs::read_to_string(file)?;
    let service = build_service(&settings)?;

    let spinner = Output::spinner("Generating meeting minutes...");
    match service.generate_meeting_minutes(&transcript).await {
        Ok(minutes) => {
            spinner.finish_and_clear();
            Output::success("Meeting minutes generated.");
            write_result(&minutes, output)
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate minutes: {}", e));
            Err(e.into())
        }
    }
}

/// Run the financial command.
pub async fn run_financial(file: &str, output: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Document) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let transcript = std::fs::read_to_string(file)?;
    let service = build_service(&settings)?;

    let spinner = Output::spinner("Formatting financial terminology...");
    match service.format_financial_transcript(&transcript).await {
        Ok(formatted) => {
            spinner.finish_and_clear();
            Output::success("Transcript formatted.");
            write_result(&formatted, output)
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to format transcript: {}", e));
            Err(e.into())
        }
    }
}

/// Run the summarize command.
pub async fn run_summarize(
    file: &str,
    max_words: Option<usize>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Document) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let text = std::fs::read_to_string(file)?;
    let service = build_service(&settings)?;

    let spinner = Output::spinner("Summarizing...");
    match service.summarize(&text, max_words).await {
        Ok(summary) => {
            spinner.finish_and_clear();
            println!("\n{}", summary);
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to summarize: {}", e));
            Err(e.into())
        }
    }
}
