//! Text-to-speech for the source and target languages.

pub mod openai;
pub mod synthesizer;
pub mod voice;

pub use openai::OpenAiSpeech;
pub use synthesizer::{MockSpeechBackend, SpeechBackend, SpeechSynthesizer};
pub use voice::VoiceProfile;
