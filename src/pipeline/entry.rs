//! Per-entry processing: sentences → four clips → one audio file.

use crate::audio::{self, AudioClip, OutputFormat};
use crate::config::Config;
use crate::content::ContentGenerator;
use crate::error::{Result, VocabcastError};
use crate::pipeline::naming::{self, NamingScheme};
use crate::pipeline::progress::{ProgressCounter, ProgressReporter};
use crate::pipeline::types::{EntryResult, VocabEntry};
use crate::speech::SpeechSynthesizer;
use std::fs;
use std::path::{Path, PathBuf};

/// Knobs that shape an entry's output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySettings {
    pub naming: NamingScheme,
    pub separator_ms: u32,
    pub output_format: OutputFormat,
}

impl Default for EntrySettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for EntrySettings {
    fn from(config: &Config) -> Self {
        Self {
            naming: config.batch.naming,
            separator_ms: config.audio.separator_ms,
            output_format: config.audio.output_format,
        }
    }
}

/// Runs one entry end to end.
pub struct EntryProcessor {
    content: ContentGenerator,
    speech: SpeechSynthesizer,
    settings: EntrySettings,
}

impl EntryProcessor {
    pub fn new(content: ContentGenerator, speech: SpeechSynthesizer, settings: EntrySettings) -> Self {
        Self {
            content,
            speech,
            settings,
        }
    }

    /// Where the audio for `entry` at zero-based `position` goes.
    pub fn output_path(&self, entry: &VocabEntry, output_dir: &Path, position: usize) -> PathBuf {
        let stem = naming::file_stem(self.settings.naming, entry, position);
        output_dir.join(format!("{stem}.{}", self.settings.output_format.extension()))
    }

    /// Generate, synthesize, assemble and write one entry.
    pub async fn process_entry(
        &self,
        entry: &VocabEntry,
        output_dir: &Path,
        position: usize,
    ) -> Result<EntryResult> {
        self.process(entry, output_dir, position, None).await
    }

    /// Like [`process_entry`](Self::process_entry), reporting a `Processed`
    /// event once the sentences are generated.
    pub async fn process_entry_with_progress(
        &self,
        entry: &VocabEntry,
        output_dir: &Path,
        position: usize,
        progress: (&ProgressCounter, &dyn ProgressReporter),
    ) -> Result<EntryResult> {
        self.process(entry, output_dir, position, Some(progress)).await
    }

    async fn process(
        &self,
        entry: &VocabEntry,
        output_dir: &Path,
        position: usize,
        progress: Option<(&ProgressCounter, &dyn ProgressReporter)>,
    ) -> Result<EntryResult> {
        let context = self
            .content
            .generate_context(&entry.source, &entry.target)
            .await?;

        if let Some((counter, reporter)) = progress {
            counter.report_processed(reporter);
        }

        let source_tag = self.speech.source_tag();
        let target_tag = self.speech.target_tag();
        // At most one in-flight speech request per entry
        let mut encoded = Vec::with_capacity(4);
        for (text, tag) in [
            (entry.source.as_str(), source_tag),
            (entry.target.as_str(), target_tag),
            (context.source_sentence.as_str(), source_tag),
            (context.target_sentence.as_str(), target_tag),
        ] {
            encoded.push(self.speech.synthesize(text, tag).await?);
        }

        let separator_ms = self.settings.separator_ms;
        let format = self.settings.output_format;
        let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let clips = encoded
                .iter()
                .map(|bytes| audio::decode(bytes))
                .collect::<Result<Vec<AudioClip>>>()?;
            let combined = audio::assemble(&clips, separator_ms);
            audio::encode(&combined, format)
        })
        .await
        .map_err(|e| VocabcastError::TaskFailed {
            message: format!("Audio assembly task panicked: {e}"),
        })??;

        let output_path = self.output_path(entry, output_dir, position);
        write_atomic(&output_path, &bytes)?;
        log::debug!(
            "Wrote {} ({} bytes) for {:?}",
            output_path.display(),
            bytes.len(),
            entry.source
        );

        Ok(EntryResult {
            source: entry.source.clone(),
            target: entry.target.clone(),
            source_sentence: context.source_sentence,
            target_sentence: context.target_sentence,
            output_path,
        })
    }
}

/// Write through `<path>.part` and rename, so a finished name always
/// holds a complete file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut part_name = path.file_name().unwrap_or_default().to_os_string();
    part_name.push(".part");
    let part_path = path.with_file_name(part_name);

    fs::write(&part_path, bytes)?;
    if let Err(e) = fs::rename(&part_path, path) {
        let _ = fs::remove_file(&part_path);
        return Err(e.into());
    }
    Ok(())
}
