//! Delete command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::qa::{DeleteOutcome, QaService};
use anyhow::Result;

/// Run the delete command.
pub async fn run_delete(session_id: &str, settings: Settings) -> Result<()> {
    let service = QaService::from_settings(&settings)?;

    match service.delete_session(session_id).await {
        DeleteOutcome::Deleted => {
            Output::success(&format!("Deleted session {}", session_id));
            Ok(())
        }
        DeleteOutcome::IndexDeleteFailed => {
            Output::error(&format!(
                "Index deletion failed for session {}; the session record was kept. Retry later.",
                session_id
            ));
            anyhow::bail!("index deletion failed");
        }
        DeleteOutcome::NotFound => {
            Output::warning(&format!("Session not found: {}", session_id));
            Ok(())
        }
    }
}
