use crate::audio::encode::OutputFormat;
use crate::defaults;
use crate::error::{Result, VocabcastError};
use crate::pipeline::naming::NamingScheme;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub generation: GenerationConfig,
    pub speech: SpeechConfig,
    pub audio: AudioConfig,
    pub batch: BatchConfig,
}

/// Word list schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub source_field: String,
    pub target_field: String,
}

/// Example sentence generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub model: String,
    pub max_attempts: u32,
    pub delimiter: char,
    pub missing_target_sentence: String,
    /// Human-readable language names substituted into the prompts
    pub source_language: String,
    pub target_language: String,
    pub system_prompt: String,
    /// User prompt; `{source}`, `{target}`, `{source_language}`,
    /// `{target_language}` and `{delimiter}` are substituted.
    pub prompt: String,
}

/// Speech synthesis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    pub endpoint: String,
    pub model: String,
    pub max_attempts: u32,
    /// Encoding requested from the speech service
    pub response_format: OutputFormat,
    pub source_voice: VoiceConfig,
    pub target_voice: VoiceConfig,
}

/// One language tag and the service voice used for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceConfig {
    pub language_tag: String,
    pub voice: String,
}

/// Clip assembly and output encoding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub separator_ms: u32,
    pub output_format: OutputFormat,
}

/// Batch orchestration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    pub concurrency: usize,
    pub naming: NamingScheme,
    pub resume: bool,
    pub manifest_file: String,
}

const SYSTEM_PROMPT: &str = "You help students learn {source_language} to {target_language} \
vocabulary. They listen to your example sentences in the background before a test, one or two \
hundred in a row, so keep every sentence short, natural and easy to follow.";

const USER_PROMPT: &str = "Give an example of a context in which the {source_language} word \
'{source}' and its {target_language} equivalent '{target}' could be used, as two natural \
sentences: the first in {source_language}, the second in {target_language}. Make sure the \
translation is correct. Separate the two sentences with the character \"{delimiter}\".";

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            source_field: defaults::SOURCE_FIELD.to_string(),
            target_field: defaults::TARGET_FIELD.to_string(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::CHAT_ENDPOINT.to_string(),
            model: defaults::CHAT_MODEL.to_string(),
            max_attempts: defaults::GENERATION_MAX_ATTEMPTS,
            delimiter: defaults::CONTEXT_DELIMITER,
            missing_target_sentence: defaults::MISSING_TARGET_SENTENCE.to_string(),
            source_language: "Polish".to_string(),
            target_language: "British English".to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            prompt: USER_PROMPT.to_string(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::SPEECH_ENDPOINT.to_string(),
            model: defaults::TTS_MODEL.to_string(),
            max_attempts: defaults::SPEECH_MAX_ATTEMPTS,
            response_format: OutputFormat::Mp3,
            source_voice: VoiceConfig {
                language_tag: defaults::SOURCE_LANGUAGE_TAG.to_string(),
                voice: "nova".to_string(),
            },
            target_voice: VoiceConfig {
                language_tag: defaults::TARGET_LANGUAGE_TAG.to_string(),
                voice: "fable".to_string(),
            },
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            separator_ms: defaults::SEPARATOR_MS,
            output_format: OutputFormat::Mp3,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: defaults::CONCURRENCY,
            naming: NamingScheme::Position,
            resume: false,
            manifest_file: defaults::MANIFEST_FILE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is unreadable or contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't exist
    ///
    /// Only a missing file falls back to defaults; invalid TOML is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(VocabcastError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOCABCAST_CHAT_MODEL → generation.model
    /// - VOCABCAST_TTS_MODEL → speech.model
    /// - VOCABCAST_CONCURRENCY → batch.concurrency (ignored unless a positive integer)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("VOCABCAST_CHAT_MODEL")
            && !model.is_empty()
        {
            self.generation.model = model;
        }

        if let Ok(model) = std::env::var("VOCABCAST_TTS_MODEL")
            && !model.is_empty()
        {
            self.speech.model = model;
        }

        if let Ok(value) = std::env::var("VOCABCAST_CONCURRENCY") {
            match value.parse::<usize>() {
                Ok(n) if n > 0 => self.batch.concurrency = n,
                _ => log::warn!("Ignoring VOCABCAST_CONCURRENCY={value:?}: not a positive integer"),
            }
        }

        self
    }

    /// Check values the type system can't.
    pub fn validate(&self) -> Result<()> {
        if self.batch.concurrency == 0 {
            return Err(VocabcastError::ConfigInvalidValue {
                key: "batch.concurrency".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.input.source_field.is_empty() || self.input.target_field.is_empty() {
            return Err(VocabcastError::ConfigInvalidValue {
                key: "input".to_string(),
                message: "field names must not be empty".to_string(),
            });
        }
        if self.speech.source_voice.language_tag == self.speech.target_voice.language_tag {
            return Err(VocabcastError::ConfigInvalidValue {
                key: "speech.target_voice.language_tag".to_string(),
                message: format!(
                    "must differ from the source tag ({})",
                    self.speech.source_voice.language_tag
                ),
            });
        }
        if self.batch.manifest_file.is_empty() {
            return Err(VocabcastError::ConfigInvalidValue {
                key: "batch.manifest_file".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/vocabcast/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("vocabcast")
            .join("config.toml")
    }
}
