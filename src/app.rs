//! Application entry point.
//!
//! Wires the configured services into the pipeline and runs one batch:
//! load word list → generate + synthesize per entry → write files and manifest

use crate::audio::OutputFormat;
use crate::config::Config;
use crate::content::{ContentGenerator, OpenAiChat, TextGenerator};
use crate::defaults;
use crate::error::{Result, VocabcastError};
use crate::input::load_entries;
use crate::pipeline::{
    BatchOptions, BatchOrchestrator, EntryProcessor, EntrySettings, Manifest, ProgressReporter,
    SilentReporter, StdoutReporter,
};
use crate::speech::{OpenAiSpeech, SpeechBackend, SpeechSynthesizer};
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

/// Run one batch: read `input`, write audio and the manifest to `output_dir`.
///
/// # Arguments
/// * `config` - Fully resolved configuration (file, environment and CLI)
/// * `input` - Word list path
/// * `output_dir` - Directory receiving the audio files and manifest
/// * `quiet` - Suppress progress lines on stdout
pub async fn run_batch_command(
    config: &Config,
    input: &Path,
    output_dir: &Path,
    quiet: bool,
) -> Result<Manifest> {
    config.validate()?;
    check_prerequisites(config)?;

    let entries = load_entries(input, &config.input)?;
    log::info!("Loaded {} entries from {}", entries.len(), input.display());

    let api_key = api_key()?;
    let client = reqwest::Client::new();
    let text: Arc<dyn TextGenerator> =
        Arc::new(OpenAiChat::new(client.clone(), api_key.clone(), &config.generation));
    let speech: Arc<dyn SpeechBackend> =
        Arc::new(OpenAiSpeech::new(client, api_key, &config.speech));
    let reporter: Arc<dyn ProgressReporter> = if quiet {
        Arc::new(SilentReporter)
    } else {
        Arc::new(StdoutReporter)
    };

    build_orchestrator(config, text, speech, reporter)
        .run_batch(&entries, output_dir)
        .await
}

/// Assemble the pipeline around the given service backends.
pub fn build_orchestrator(
    config: &Config,
    text: Arc<dyn TextGenerator>,
    speech: Arc<dyn SpeechBackend>,
    reporter: Arc<dyn ProgressReporter>,
) -> BatchOrchestrator {
    log::debug!(
        "Using chat model '{}' and speech backend '{}'",
        text.model_name(),
        speech.name()
    );
    let processor = EntryProcessor::new(
        ContentGenerator::new(text, config.generation.clone()),
        SpeechSynthesizer::from_config(speech, &config.speech),
        EntrySettings::from(config),
    );
    BatchOrchestrator::new(processor, BatchOptions::from(&config.batch)).with_reporter(reporter)
}

fn api_key() -> Result<String> {
    match std::env::var(defaults::API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(VocabcastError::ConfigInvalidValue {
            key: defaults::API_KEY_ENV.to_string(),
            message: "environment variable must be set to an API key".to_string(),
        }),
    }
}

/// Fail before any paid API call when the output can't be encoded.
fn check_prerequisites(config: &Config) -> Result<()> {
    if config.audio.output_format == OutputFormat::Mp3
        && Command::new("ffmpeg").arg("-version").output().is_err()
    {
        return Err(VocabcastError::AudioEncode {
            message: "ffmpeg not found in PATH (required for MP3 output).\n\
                      Install it (e.g. sudo apt install ffmpeg) or use --format wav"
                .to_string(),
        });
    }
    Ok(())
}
