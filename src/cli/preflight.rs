//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::error::{Result, SporreError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Storing content requires an API key for embeddings.
    Store,
    /// Asking questions requires an API key.
    Ask,
    /// Transcription requires an API key.
    Transcribe,
    /// Image/vision analysis requires an API key.
    Vision,
    /// Document processing requires an API key.
    Document,
    /// Listing sessions has no external requirements.
    List,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Store
        | Operation::Ask
        | Operation::Transcribe
        | Operation::Vision
        | Operation::Document => check_api_key(),
        Operation::List => Ok(()),
    }
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(SporreError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(SporreError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_has_no_requirements() {
        assert!(check(Operation::List).is_ok());
    }
}
