//! Error types for vocabcast.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VocabcastError {
    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Caller errors (never retried)
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Invalid input in {path}: {message}")]
    InvalidInput { path: String, message: String },

    // External service errors
    #[error("Text generation failed: {message}")]
    TextGeneration { message: String },

    #[error("Speech synthesis failed: {message}")]
    SpeechSynthesis { message: String },

    // Audio errors
    #[error("Audio decoding failed: {message}")]
    AudioDecode { message: String },

    #[error("Audio encoding failed: {message}")]
    AudioEncode { message: String },

    // Worker errors
    #[error("Entry task failed: {message}")]
    TaskFailed { message: String },

    // Serialization and I/O
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl VocabcastError {
    /// Shorthand for [`VocabcastError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Whether another attempt at the same call could succeed.
    ///
    /// Argument and input errors are deterministic; everything else coming
    /// back from a service or the filesystem may be transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::InvalidArgument { .. }
                | Self::InvalidInput { .. }
                | Self::ConfigInvalidValue { .. }
                | Self::Config(_)
        )
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VocabcastError>;
