//! CLI command implementations.

mod analyze;
mod ask;
mod config;
mod delete;
mod doctor;
mod document;
mod init;
mod nutrition;
mod serve;
mod sessions;
mod store;
mod transcribe;

pub use analyze::run_analyze;
pub use ask::run_ask;
pub use config::run_config;
pub use delete::run_delete;
pub use doctor::run_doctor;
pub use document::{run_financial, run_minutes, run_summarize};
pub use init::run_init;
pub use nutrition::run_nutrition;
pub use serve::run_serve;
pub use sessions::run_sessions;
pub use store::run_store;
pub use transcribe::run_transcribe;
