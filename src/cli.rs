//! Command-line interface for vocabcast
//!
//! Provides argument parsing using clap derive macros.

use crate::audio::OutputFormat;
use crate::config::Config;
use crate::defaults;
use crate::pipeline::naming::NamingScheme;
use clap::Parser;
use std::path::PathBuf;

/// Turn a vocabulary list into spoken study clips
#[derive(Parser, Debug)]
#[command(
    name = "vocabcast",
    version,
    about = "Turn a vocabulary list into spoken study clips"
)]
pub struct Cli {
    /// Directory receiving the audio files and content.json
    #[arg(value_name = "OUTPUT_DIR", default_value = defaults::OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Word list (JSON array of objects)
    #[arg(long, short = 'i', value_name = "PATH", default_value = defaults::INPUT_FILE)]
    pub input: PathBuf,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Entries processed at once (default: 10)
    #[arg(long, short = 'j', value_name = "N", conflicts_with = "sequential")]
    pub concurrency: Option<usize>,

    /// Process one entry at a time
    #[arg(long)]
    pub sequential: bool,

    /// Output file naming: position, hash or slug
    #[arg(long, value_name = "SCHEME")]
    pub naming: Option<NamingScheme>,

    /// Output audio format: mp3 or wav
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Silence after each clip (default: 500ms). Examples: 250ms, 1s
    #[arg(long, value_name = "DURATION", value_parser = parse_separator_ms)]
    pub separator: Option<u32>,

    /// Skip entries already listed in an existing manifest
    #[arg(long)]
    pub resume: bool,

    /// Suppress progress output (quiet mode)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (-v: info logs, -vv: debug logs)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse a separator duration into milliseconds.
///
/// Bare numbers are milliseconds; anything else goes through `humantime`
/// (`500ms`, `1s`, `1s 200ms`).
fn parse_separator_ms(s: &str) -> Result<u32, String> {
    let s = s.trim();
    if let Ok(ms) = s.parse::<u32>() {
        return Ok(ms);
    }
    let duration = humantime::parse_duration(s).map_err(|e| e.to_string())?;
    u32::try_from(duration.as_millis()).map_err(|_| format!("separator too long: {s}"))
}

impl Cli {
    /// Entries processed at once, if set on the command line.
    pub fn concurrency_override(&self) -> Option<usize> {
        if self.sequential {
            Some(1)
        } else {
            self.concurrency
        }
    }

    /// Apply command-line overrides on top of file and environment config.
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(concurrency) = self.concurrency_override() {
            config.batch.concurrency = concurrency;
        }
        if let Some(naming) = self.naming {
            config.batch.naming = naming;
        }
        if let Some(format) = self.format {
            config.audio.output_format = format;
        }
        if let Some(separator_ms) = self.separator {
            config.audio.separator_ms = separator_ms;
        }
        if self.resume {
            config.batch.resume = true;
        }
        config
    }
}
