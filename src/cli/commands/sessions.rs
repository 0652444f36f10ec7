//! Sessions command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::qa::QaService;
use anyhow::Result;

/// Run the sessions command.
pub async fn run_sessions(settings: Settings) -> Result<()> {
    preflight::check(Operation::List)?;

    let service = QaService::from_settings(&settings)?;

    let sessions = service.list_sessions();
    if sessions.is_empty() {
        Output::info("No active sessions in this process.");
        Output::info(
            "Sessions are created by 'sporre store' and live for the life of the process; \
             a long-running session table is available through 'sporre serve'.",
        );
    } else {
        Output::header(&format!("Active Sessions ({})", sessions.len()));
        println!();

        for session in &sessions {
            Output::session_info(
                &session.title,
                &session.id,
                session.chunk_count,
                session.content_length,
            );
        }
    }

    Ok(())
}
