//! Word list loading.
//!
//! The list is a JSON array of objects; two configurable string fields hold
//! the source and target words. Other fields are ignored.

use crate::config::InputConfig;
use crate::error::{Result, VocabcastError};
use crate::pipeline::types::VocabEntry;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Read and validate the word list at `path`.
pub fn load_entries(path: &Path, config: &InputConfig) -> Result<Vec<VocabEntry>> {
    let contents = fs::read_to_string(path).map_err(|e| VocabcastError::InvalidInput {
        path: path.display().to_string(),
        message: format!("cannot read file: {e}"),
    })?;
    parse_entries(&contents, config).map_err(|message| VocabcastError::InvalidInput {
        path: path.display().to_string(),
        message,
    })
}

/// Parse a word list held in memory.
///
/// Errors name the offending entry by its zero-based index.
pub fn parse_entries(
    json: &str,
    config: &InputConfig,
) -> std::result::Result<Vec<VocabEntry>, String> {
    let items: Vec<Map<String, Value>> =
        serde_json::from_str(json).map_err(|e| format!("expected an array of objects: {e}"))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            Ok(VocabEntry::new(
                string_field(item, &config.source_field, index)?,
                string_field(item, &config.target_field, index)?,
            ))
        })
        .collect()
}

fn string_field(
    item: &Map<String, Value>,
    field: &str,
    index: usize,
) -> std::result::Result<String, String> {
    match item.get(field) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(format!(
            "entry {index}: field '{field}' must be a string, got {other}"
        )),
        None => Err(format!("entry {index}: missing field '{field}'")),
    }
}
