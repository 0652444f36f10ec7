//! Store command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::qa::{QaService, StoreRequest};
use anyhow::Result;
use std::io::Read;
use std::path::Path;

/// Run the store command.
pub async fn run_store(
    file: Option<&str>,
    title: Option<String>,
    url: Option<String>,
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
    questions: &[String],
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Store) {
        Output::error(&format!("{}", e));
        Output::info("Run 'sporre doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let content = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let title = title.unwrap_or_else(|| {
        file.and_then(|p| Path::new(p).file_stem().and_then(|s| s.to_str()))
            .unwrap_or("Untitled Page")
            .to_string()
    });

    let service = QaService::from_settings(&settings)?;

    let mut request = StoreRequest::new(title, url.unwrap_or_default(), content);
    request.chunk_size = chunk_size;
    request.chunk_overlap = chunk_overlap;

    let spinner = Output::spinner("Chunking, embedding, and indexing...");

    let session_id = match service.store(request).await {
        Ok(session_id) => {
            spinner.finish_and_clear();
            session_id
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to store content: {}", e));
            return Err(e.into());
        }
    };

    Output::success("Content stored.");
    println!();
    Output::kv("Session ID", &session_id);
    if let Some(session) = service.session_info(&session_id) {
        Output::kv("Title", &session.title);
        Output::kv("Chunks", &session.chunk_count.to_string());
        Output::kv("Content length", &format!("{} chars", session.content_length));
    }

    // Session metadata lives only as long as this process, so follow-up
    // questions are answered here rather than in a later invocation.
    for question in questions {
        println!();
        Output::info(&format!("Question: {}", question));

        let spinner = Output::spinner("Searching stored content...");
        match service.ask(&session_id, question, settings.qa.top_k).await {
            Ok(answer) => {
                spinner.finish_and_clear();
                println!("\n{}", answer);
            }
            Err(e) => {
                spinner.finish_and_clear();
                Output::error(&format!("Failed to answer: {}", e));
                return Err(e.into());
            }
        }
    }

    if questions.is_empty() {
        println!();
        Output::info("Run 'sporre serve' to expose this store/ask workflow over HTTP.");
    }

    Ok(())
}
