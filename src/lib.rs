//! vocabcast - spoken vocabulary study clips
//!
//! Turns a list of source/target word pairs into one audio file per pair:
//! both words, then an example sentence in each language, separated by
//! silence. A `content.json` manifest maps every file to its text.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod content;
pub mod defaults;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod retry;
pub mod speech;

// Composition root
pub mod app;

// Service seams (real client vs mock)
pub use content::{MockTextGenerator, OpenAiChat, TextGenerator};
pub use speech::{MockSpeechBackend, OpenAiSpeech, SpeechBackend};

// Pipeline
pub use pipeline::{
    BatchOptions, BatchOrchestrator, EntryProcessor, EntryResult, EntrySettings, Manifest,
    ManifestRecord, NamingScheme, VocabEntry,
};

// Error handling
pub use error::{Result, VocabcastError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
