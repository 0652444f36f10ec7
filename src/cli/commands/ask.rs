//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::SporreError;
use crate::qa::QaService;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    session_id: &str,
    question: &str,
    top_k: Option<usize>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        Output::info("Run 'sporre doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let service = QaService::from_settings(&settings)?;
    let top_k = top_k.unwrap_or(settings.qa.top_k);

    let spinner = Output::spinner("Searching stored content...");

    match service.ask(session_id, question, top_k).await {
        Ok(answer) => {
            spinner.finish_and_clear();
            println!("\n{}\n", answer);
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to answer: {}", e));
            if matches!(e, SporreError::SessionNotFound(_)) {
                Output::info(
                    "Sessions live for the life of one process. Store and ask in the same \
                     run with 'sporre store --ask', or use the HTTP API via 'sporre serve'.",
                );
            }
            Err(e.into())
        }
    }
}
