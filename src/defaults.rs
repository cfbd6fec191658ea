//! Default configuration constants for vocabcast.
//!
//! Shared by the config file defaults, the CLI and the pipeline so that every
//! entry point agrees on the same values.

/// Default number of entries processed concurrently.
pub const CONCURRENCY: usize = 10;

/// Default silence between stitched clips, in milliseconds.
///
/// Appended after every clip, including the last one.
pub const SEPARATOR_MS: u32 = 500;

/// Total attempts for a speech synthesis call (1 call + 3 retries).
pub const SPEECH_MAX_ATTEMPTS: u32 = 4;

/// Total attempts for a text generation call.
///
/// Text generation is not retried unless configured otherwise.
pub const GENERATION_MAX_ATTEMPTS: u32 = 1;

/// Delimiter the language model is asked to put between the two sentences.
pub const CONTEXT_DELIMITER: char = '|';

/// Target sentence used when the model response has no delimiter.
pub const MISSING_TARGET_SENTENCE: &str = "Brak kontekstu po angielsku.";

/// Number of hex digits kept from the content hash in file names.
pub const HASH_LENGTH: usize = 5;

/// Manifest file written into the output directory.
pub const MANIFEST_FILE: &str = "content.json";

/// Word list read from the working directory.
pub const INPUT_FILE: &str = "input.json";

/// Output directory when none is given on the command line.
pub const OUTPUT_DIR: &str = "./out";

/// Input JSON field holding the source-language word.
pub const SOURCE_FIELD: &str = "pl";

/// Input JSON field holding the target-language word.
pub const TARGET_FIELD: &str = "en";

/// Language tag of the source-language voice.
pub const SOURCE_LANGUAGE_TAG: &str = "pl-PL";

/// Language tag of the target-language voice.
pub const TARGET_LANGUAGE_TAG: &str = "en-GB";

/// Sample rate of assembled clips when there is nothing to take it from.
///
/// Both supported speech services return 24kHz audio.
pub const SAMPLE_RATE: u32 = 24000;

/// Default chat completion model.
pub const CHAT_MODEL: &str = "gpt-3.5-turbo";

/// Default speech model.
pub const TTS_MODEL: &str = "tts-1";

pub const CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

pub const SPEECH_ENDPOINT: &str = "https://api.openai.com/v1/audio/speech";

/// Environment variable holding the API key for both services.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
