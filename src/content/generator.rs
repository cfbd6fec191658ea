use crate::config::GenerationConfig;
use crate::error::{Result, VocabcastError};
use crate::pipeline::types::ContextPair;
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for the external text-generation service.
///
/// This trait allows swapping implementations (real chat API vs mock).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete a conversation made of one system and one user message.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the name of the model answering requests
    fn model_name(&self) -> &str;
}

/// Turns a word pair into two example sentences.
pub struct ContentGenerator {
    backend: Arc<dyn TextGenerator>,
    config: GenerationConfig,
    retry: RetryPolicy,
}

impl ContentGenerator {
    /// Create a generator; the attempt count comes from `config.max_attempts`.
    pub fn new(backend: Arc<dyn TextGenerator>, config: GenerationConfig) -> Self {
        let retry = RetryPolicy::new(config.max_attempts);
        Self {
            backend,
            config,
            retry,
        }
    }

    /// Fill the placeholders of `template` for one word pair.
    pub fn render(&self, template: &str, source_word: &str, target_word: &str) -> String {
        template
            .replace("{source_language}", &self.config.source_language)
            .replace("{target_language}", &self.config.target_language)
            .replace("{source}", source_word)
            .replace("{target}", target_word)
            .replace("{delimiter}", &self.config.delimiter.to_string())
    }

    /// Ask the model for one sentence per language using the given words.
    ///
    /// A response without the delimiter is not an error: it becomes the
    /// source sentence and the target sentence falls back to the configured
    /// placeholder.
    pub async fn generate_context(
        &self,
        source_word: &str,
        target_word: &str,
    ) -> Result<ContextPair> {
        if source_word.trim().is_empty() || target_word.trim().is_empty() {
            return Err(VocabcastError::invalid_argument(format!(
                "both words are required, got {source_word:?} / {target_word:?}"
            )));
        }

        let system = self.render(&self.config.system_prompt, source_word, target_word);
        let prompt = self.render(&self.config.prompt, source_word, target_word);
        let backend = self.backend.as_ref();
        let (system, prompt) = (system.as_str(), prompt.as_str());

        let response = self
            .retry
            .run("generate context", move || backend.complete(system, prompt))
            .await?;

        let pair = split_context(
            &response,
            self.config.delimiter,
            &self.config.missing_target_sentence,
        );
        log::debug!(
            "Context for {source_word:?}/{target_word:?}: {:?} | {:?}",
            pair.source_sentence,
            pair.target_sentence
        );
        Ok(pair)
    }
}

/// Split a model response on the first `delimiter`.
///
/// Both halves are trimmed. Without a delimiter the whole response is the
/// source sentence and `placeholder` is the target sentence.
pub fn split_context(response: &str, delimiter: char, placeholder: &str) -> ContextPair {
    match response.split_once(delimiter) {
        Some((source, target)) => ContextPair {
            source_sentence: source.trim().to_string(),
            target_sentence: target.trim().to_string(),
        },
        None => {
            log::warn!("Model response has no '{delimiter}' delimiter, using placeholder: {response:?}");
            ContextPair {
                source_sentence: response.trim().to_string(),
                target_sentence: placeholder.to_string(),
            }
        }
    }
}

/// Mock text generator for testing
#[derive(Debug, Default)]
pub struct MockTextGenerator {
    response: Option<String>,
    failures_left: AtomicUsize,
    always_fail: bool,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockTextGenerator {
    /// Mock that always answers with `response`
    pub fn new(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            ..Self::default()
        }
    }

    /// Mock that answers with the user prompt it was given
    pub fn echo() -> Self {
        Self::default()
    }

    /// Fail the first `count` calls
    pub fn with_failures(self, count: usize) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    /// Fail every call
    pub fn with_failure(mut self) -> Self {
        self.always_fail = true;
        self
    }

    /// Number of `complete` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// User prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let scheduled_failure = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if self.always_fail || scheduled_failure {
            return Err(VocabcastError::TextGeneration {
                message: format!("mock generation failure #{call}"),
            });
        }

        Ok(self
            .response
            .clone()
            .unwrap_or_else(|| prompt.to_string()))
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
