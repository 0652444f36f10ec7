//! Transcribe command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::transcription::{Transcriber, WhisperTranscriber};
use anyhow::Result;
use std::path::Path;

/// Run the transcribe command.
pub async fn run_transcribe(
    audio: &str,
    language: Option<String>,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Transcribe) {
        Output::error(&format!("{}", e));
        Output::info("Run 'sporre doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let transcriber = WhisperTranscriber::with_model(&settings.transcription.model);
    let language = language.or_else(|| settings.transcription.language.clone());

    let spinner = Output::spinner("Transcribing audio...");

    let result = match language.as_deref() {
        Some(lang) => {
            transcriber
                .transcribe_with_language(Path::new(audio), lang)
                .await
        }
        None => transcriber.transcribe(Path::new(audio)).await,
    };

    match result {
        Ok(transcript) => {
            spinner.finish_and_clear();

            Output::success(&format!(
                "Transcription complete ({} characters, language {})",
                transcript.text.len(),
                transcript.language
            ));

            match output {
                Some(path) => {
                    std::fs::write(&path, &transcript.text)?;
                    Output::info(&format!("Transcript written to {}", path));
                }
                None => {
                    println!("\n{}", transcript.text);
                }
            }
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Transcription failed: {}", e));
            Err(e.into())
        }
    }
}
