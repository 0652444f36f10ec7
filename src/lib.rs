//! Sporre - AI Content Processing and Webpage Q&A
//!
//! A CLI toolkit for transcribing audio, analyzing images, processing
//! documents, and asking questions about stored webpage content.
//!
//! The name "Sporre" comes from the Norwegian word "spørre," meaning
//! "to ask."
//!
//! # Overview
//!
//! Sporre allows you to:
//! - Store webpage content and ask questions about it, grounded in the
//!   stored text
//! - Transcribe audio files to text
//! - Analyze images and extract text with a vision model
//! - Generate meeting minutes, format financial transcripts, and summarize
//!   documents
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt template management
//! - `chunking` - Fixed-size text chunking with overlap
//! - `embedding` - Embedding generation
//! - `vector_index` - Vector index abstraction with session filtering
//! - `session` - Session bookkeeping for ingested documents
//! - `llm` - Language model abstraction (text and vision)
//! - `qa` - The question-answering orchestrator
//! - `transcription` - Speech-to-text transcription
//! - `image` - Image analysis
//! - `nutrition` - Nutrition analysis of food images
//! - `document` - Meeting minutes, financial formatting, summarization
//!
//! # Example
//!
//! ```rust,no_run
//! use sporre::config::Settings;
//! use sporre::qa::{QaService, StoreRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let service = QaService::from_settings(&settings)?;
//!
//!     let session_id = service
//!         .store(StoreRequest::new(
//!             "Python Guide",
//!             "https://example.com/python-guide",
//!             "Python is a high-level, interpreted language...",
//!         ))
//!         .await?;
//!
//!     let answer = service.ask(&session_id, "What is Python?", 3).await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod image;
pub mod llm;
pub mod nutrition;
pub mod openai;
pub mod qa;
pub mod session;
pub mod transcription;
pub mod vector_index;

pub use error::{Result, SporreError};
