//! Data types flowing through the batch pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One source/target word pair from the input list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VocabEntry {
    pub source: String,
    pub target: String,
}

impl VocabEntry {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Example sentences generated for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextPair {
    pub source_sentence: String,
    pub target_sentence: String,
}

/// Outcome of processing one entry, produced after its audio file is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryResult {
    pub source: String,
    pub target: String,
    pub source_sentence: String,
    pub target_sentence: String,
    pub output_path: PathBuf,
}

impl EntryResult {
    /// Manifest key: the file name of `output_path`.
    pub fn file_name(&self) -> String {
        self.output_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
