//! Example sentence generation.

pub mod generator;
pub mod openai;

pub use generator::{ContentGenerator, MockTextGenerator, TextGenerator, split_context};
pub use openai::OpenAiChat;
