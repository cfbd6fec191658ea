//! Batch orchestration: bounded fan-out over entries, completion-order
//! collection and the manifest.
//!
//! Every entry runs as its own task on a [`JoinSet`]; a [`Semaphore`]
//! bounds how many of them do work at once. Results are collected on the
//! calling task, which is the only writer of the manifest.
//!
//! The first failed entry aborts the rest of the batch. Before the error is
//! returned, the entries already collected are written as a checkpoint
//! manifest so a `resume` run can skip them.

use crate::config::BatchConfig;
use crate::error::{Result, VocabcastError};
use crate::pipeline::entry::EntryProcessor;
use crate::pipeline::manifest::Manifest;
use crate::pipeline::progress::{ProgressCounter, ProgressReporter, StdoutReporter};
use crate::pipeline::types::{EntryResult, VocabEntry};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Batch-level options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Entries processed at once; 1 is sequential mode
    pub concurrency: usize,
    /// Reuse entries already recorded in an existing manifest
    pub resume: bool,
    pub manifest_file: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::from(&BatchConfig::default())
    }
}

impl From<&BatchConfig> for BatchOptions {
    fn from(config: &BatchConfig) -> Self {
        Self {
            concurrency: config.concurrency,
            resume: config.resume,
            manifest_file: config.manifest_file.clone(),
        }
    }
}

/// One entry that still has to be processed.
struct PendingEntry {
    position: usize,
    entry: VocabEntry,
}

/// Entries sorted into work still to do and records carried over.
struct BatchPlan {
    pending: Vec<PendingEntry>,
    manifest: Manifest,
    total: usize,
}

pub struct BatchOrchestrator {
    processor: Arc<EntryProcessor>,
    options: BatchOptions,
    reporter: Arc<dyn ProgressReporter>,
}

impl BatchOrchestrator {
    /// Orchestrator printing progress to stdout.
    pub fn new(processor: EntryProcessor, options: BatchOptions) -> Self {
        Self {
            processor: Arc::new(processor),
            options,
            reporter: Arc::new(StdoutReporter),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn manifest_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.options.manifest_file)
    }

    /// Process `entries` into `output_dir` and write the manifest there.
    ///
    /// Returns the manifest as written.
    pub async fn run_batch(&self, entries: &[VocabEntry], output_dir: &Path) -> Result<Manifest> {
        if self.options.concurrency == 0 {
            return Err(VocabcastError::invalid_argument(
                "concurrency must be at least 1",
            ));
        }
        fs::create_dir_all(output_dir)?;
        let manifest_path = self.manifest_path(output_dir);

        let BatchPlan {
            pending,
            mut manifest,
            total,
        } = self.plan(entries, output_dir, &manifest_path)?;

        let carried = manifest.len();
        if carried > 0 {
            log::info!("Resuming: {carried} of {total} entries already done");
        }
        log::info!(
            "Processing {} entries into {} ({} at a time)",
            pending.len(),
            output_dir.display(),
            self.options.concurrency
        );

        let processed = Arc::new(ProgressCounter::new(carried, total));
        let saved = ProgressCounter::new(carried, total);
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency));
        let mut tasks = JoinSet::new();

        for PendingEntry { position, entry } in pending {
            let processor = self.processor.clone();
            let reporter = self.reporter.clone();
            let processed = processed.clone();
            let semaphore = semaphore.clone();
            let output_dir = output_dir.to_path_buf();

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| VocabcastError::TaskFailed {
                        message: format!("Worker pool closed: {e}"),
                    })?;
                processor
                    .process_entry_with_progress(
                        &entry,
                        &output_dir,
                        position,
                        (processed.as_ref(), reporter.as_ref()),
                    )
                    .await
                    .map_err(|e| {
                        log::error!("Entry {position} ({:?}) failed: {e}", entry.source);
                        e
                    })
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| VocabcastError::TaskFailed {
                message: format!("Entry task panicked: {e}"),
            });
            match outcome.and_then(|result| result) {
                Ok(result) => self.collect(&mut manifest, &result, &saved),
                Err(e) => {
                    tasks.abort_all();
                    self.write_checkpoint(&manifest, &manifest_path);
                    return Err(e);
                }
            }
        }

        manifest.write_atomic(&manifest_path)?;
        log::info!(
            "Wrote {} entries to {}",
            manifest.len(),
            manifest_path.display()
        );
        Ok(manifest)
    }

    /// Split entries into pending work and records reused from an earlier run.
    fn plan(
        &self,
        entries: &[VocabEntry],
        output_dir: &Path,
        manifest_path: &Path,
    ) -> Result<BatchPlan> {
        let previous = if self.options.resume && manifest_path.exists() {
            Manifest::load(manifest_path)?
        } else {
            Manifest::new()
        };

        let mut seen = HashSet::new();
        let mut pending = Vec::new();
        let mut manifest = Manifest::new();

        for (position, entry) in entries.iter().enumerate() {
            let path = self.processor.output_path(entry, output_dir, position);
            let file_name = file_name_of(&path);

            if !seen.insert(file_name.clone()) {
                log::info!(
                    "Skipping duplicate entry {position} ({:?} / {:?}): {file_name} already scheduled",
                    entry.source,
                    entry.target
                );
                continue;
            }

            if let Some(record) = previous.get(&file_name)
                && path.is_file()
            {
                if record.source == entry.source && record.target == entry.target {
                    log::debug!("Reusing {file_name} from previous run");
                    manifest.insert(file_name, record.clone());
                    continue;
                }
                log::info!(
                    "Regenerating {file_name}: previous run recorded {:?} / {:?}",
                    record.source,
                    record.target
                );
            }

            pending.push(PendingEntry {
                position,
                entry: entry.clone(),
            });
        }

        Ok(BatchPlan {
            pending,
            manifest,
            total: seen.len(),
        })
    }

    fn collect(&self, manifest: &mut Manifest, result: &EntryResult, saved: &ProgressCounter) {
        manifest.insert_result(result);
        saved.report_saved(self.reporter.as_ref(), result.output_path.clone());
    }

    fn write_checkpoint(&self, manifest: &Manifest, manifest_path: &Path) {
        match manifest.write_atomic(manifest_path) {
            Ok(()) => log::warn!(
                "Batch aborted; checkpoint with {} entries written to {}",
                manifest.len(),
                manifest_path.display()
            ),
            Err(e) => log::error!(
                "Batch aborted; failed to write checkpoint {}: {e}",
                manifest_path.display()
            ),
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
