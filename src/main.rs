//! Sporre CLI entry point.

use anyhow::Result;
use clap::Parser;
use sporre::cli::{commands, Cli, Commands};
use sporre::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("sporre={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure the data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match &cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Store {
            file,
            title,
            url,
            chunk_size,
            chunk_overlap,
            ask,
        } => {
            commands::run_store(
                file.as_deref(),
                title.clone(),
                url.clone(),
                *chunk_size,
                *chunk_overlap,
                ask,
                settings,
            )
            .await?;
        }

        Commands::Ask {
            session_id,
            question,
            top_k,
        } => {
            commands::run_ask(session_id, question, *top_k, settings).await?;
        }

        Commands::Sessions => {
            commands::run_sessions(settings).await?;
        }

        Commands::Delete { session_id } => {
            commands::run_delete(session_id, settings).await?;
        }

        Commands::Transcribe {
            audio,
            language,
            output,
        } => {
            commands::run_transcribe(audio, language.clone(), output.clone(), settings).await?;
        }

        Commands::Minutes { file, output } => {
            commands::run_minutes(file, output.clone(), settings).await?;
        }

        Commands::Financial { file, output } => {
            commands::run_financial(file, output.clone(), settings).await?;
        }

        Commands::Summarize { file, max_words } => {
            commands::run_summarize(file, *max_words, settings).await?;
        }

        Commands::Analyze {
            image,
            prompt,
            extract_text,
        } => {
            commands::run_analyze(image, prompt.clone(), *extract_text, settings).await?;
        }

        Commands::Nutrition { image, prompt } => {
            commands::run_nutrition(image, prompt.clone(), settings).await?;
        }

        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| settings.server.host.clone());
            let port = port.unwrap_or(settings.server.port);
            commands::run_serve(&host, port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
