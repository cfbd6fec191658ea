//! The `content.json` manifest: output file name → text fields.

use crate::error::Result;
use crate::pipeline::types::EntryResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Text fields recorded for one audio file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub source: String,
    pub target: String,
    pub source_sentence: String,
    pub target_sentence: String,
}

impl From<&EntryResult> for ManifestRecord {
    fn from(result: &EntryResult) -> Self {
        Self {
            source: result.source.clone(),
            target: result.target.clone(),
            source_sentence: result.source_sentence.clone(),
            target_sentence: result.target_sentence.clone(),
        }
    }
}

/// Mapping keyed by output file name (not path).
///
/// Keys are kept sorted so the written file does not depend on completion
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    records: BTreeMap<String, ManifestRecord>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished entry under its file name.
    ///
    /// Returns the record previously stored under that name, if any.
    pub fn insert_result(&mut self, result: &EntryResult) -> Option<ManifestRecord> {
        self.insert(result.file_name(), ManifestRecord::from(result))
    }

    pub fn insert(&mut self, file_name: String, record: ManifestRecord) -> Option<ManifestRecord> {
        self.records.insert(file_name, record)
    }

    pub fn get(&self, file_name: &str) -> Option<&ManifestRecord> {
        self.records.get(file_name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ManifestRecord)> {
        self.records.iter()
    }

    /// Serialize as JSON indented with four spaces.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write to `path` through a temporary sibling file and a rename, so
    /// readers never see a half-written manifest.
    pub fn write_atomic(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, json)?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        log::debug!("Wrote manifest with {} entries to {}", self.len(), path.display());
        Ok(())
    }

    /// Read a manifest written by [`Manifest::write_atomic`].
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
