//! Batch audio generation pipeline.
//!
//! ```text
//! entries → BatchOrchestrator → EntryProcessor (one task per entry)
//!             generate context → synthesize ×4 → decode → assemble → encode → file
//!           → Manifest (content.json)
//! ```

pub mod entry;
pub mod manifest;
pub mod naming;
pub mod orchestrator;
pub mod progress;
pub mod types;

pub use entry::{EntryProcessor, EntrySettings};
pub use manifest::{Manifest, ManifestRecord};
pub use naming::NamingScheme;
pub use orchestrator::{BatchOptions, BatchOrchestrator};
pub use progress::{
    CollectingReporter, ProgressCounter, ProgressEvent, ProgressReporter, SilentReporter,
    StdoutReporter,
};
pub use types::{ContextPair, EntryResult, VocabEntry};
