//! CLI module for Sporre.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Sporre - AI Content Processing and Webpage Q&A
///
/// A CLI toolkit for transcribing audio, analyzing images, processing
/// documents, and asking questions about stored webpage content.
/// The name comes from the Norwegian word "spørre," meaning "to ask."
#[derive(Parser, Debug)]
#[command(name = "sporre")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Sporre and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Store document content for question answering
    Store {
        /// File containing the content (stdin if not specified)
        file: Option<String>,

        /// Document title
        #[arg(short, long)]
        title: Option<String>,

        /// Document URL
        #[arg(short, long)]
        url: Option<String>,

        /// Chunk size in characters
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Overlap between chunks in characters
        #[arg(long)]
        chunk_overlap: Option<usize>,

        /// Question to ask about the stored content (repeatable). Session
        /// metadata lives only for the life of the process, so this is the
        /// way to ask questions from a one-shot CLI run; long-running
        /// store-then-ask workflows go through 'sporre serve'.
        #[arg(short, long = "ask")]
        ask: Vec<String>,
    },

    /// Ask a question about a stored session
    Ask {
        /// Session ID from a previous store
        session_id: String,

        /// The question to ask
        question: String,

        /// Number of relevant chunks to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// List stored sessions
    Sessions,

    /// Delete a session and its indexed content
    Delete {
        /// Session ID to delete
        session_id: String,
    },

    /// Transcribe an audio file
    Transcribe {
        /// Path to the audio file
        audio: String,

        /// Language hint (ISO 639-1 code, e.g. "en")
        #[arg(short, long)]
        language: Option<String>,

        /// Write the transcript to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate meeting minutes from a transcript
    Minutes {
        /// File containing the transcript
        file: String,

        /// Write the minutes to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Expand financial terminology in a transcript
    Financial {
        /// File containing the transcript
        file: String,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Summarize a text document
    Summarize {
        /// File containing the text
        file: String,

        /// Maximum summary length in words
        #[arg(short, long)]
        max_words: Option<usize>,
    },

    /// Analyze an image with the vision model
    Analyze {
        /// Path to the image file
        image: String,

        /// Prompt to guide the analysis
        #[arg(short, long)]
        prompt: Option<String>,

        /// Extract text from the image instead of describing it
        #[arg(long)]
        extract_text: bool,
    },

    /// Analyze food items in an image and estimate nutrition
    Nutrition {
        /// Path to the image file
        image: String,

        /// Prompt to guide the analysis
        #[arg(short, long)]
        prompt: Option<String>,
    },

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
