//! Speech synthesis with a fixed pair of voices and bounded retry.

use crate::config::SpeechConfig;
use crate::error::{Result, VocabcastError};
use crate::retry::RetryPolicy;
use crate::speech::voice::VoiceProfile;
use async_trait::async_trait;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for the external speech service.
///
/// Implementations return the encoded audio exactly as the service sent it.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &VoiceProfile) -> Result<Vec<u8>>;

    /// Short name for log messages
    fn name(&self) -> &str;
}

/// Maps the two configured language tags to voices and retries failed calls.
pub struct SpeechSynthesizer {
    backend: Arc<dyn SpeechBackend>,
    source: VoiceProfile,
    target: VoiceProfile,
    retry: RetryPolicy,
}

impl SpeechSynthesizer {
    pub fn new(
        backend: Arc<dyn SpeechBackend>,
        source: VoiceProfile,
        target: VoiceProfile,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            backend,
            source,
            target,
            retry,
        }
    }

    /// Voices and attempt count from `[speech]`.
    pub fn from_config(backend: Arc<dyn SpeechBackend>, config: &SpeechConfig) -> Self {
        Self::new(
            backend,
            VoiceProfile::from(&config.source_voice),
            VoiceProfile::from(&config.target_voice),
            RetryPolicy::new(config.max_attempts),
        )
    }

    pub fn source_tag(&self) -> &str {
        &self.source.language_tag
    }

    pub fn target_tag(&self) -> &str {
        &self.target.language_tag
    }

    /// Voice configured for `language_tag`.
    pub fn voice_for(&self, language_tag: &str) -> Result<&VoiceProfile> {
        [&self.source, &self.target]
            .into_iter()
            .find(|voice| voice.matches(language_tag))
            .ok_or_else(|| {
                VocabcastError::invalid_argument(format!(
                    "unsupported language tag '{language_tag}' (expected {} or {})",
                    self.source.language_tag, self.target.language_tag
                ))
            })
    }

    /// Synthesize `text` with the voice for `language_tag`.
    ///
    /// Transient failures are retried up to the configured attempt count;
    /// the last error is returned unchanged once they run out.
    pub async fn synthesize(&self, text: &str, language_tag: &str) -> Result<Vec<u8>> {
        if text.trim().is_empty() {
            return Err(VocabcastError::invalid_argument(
                "cannot synthesize empty text",
            ));
        }
        let voice = self.voice_for(language_tag)?;
        let backend = self.backend.as_ref();
        let label = format!("synthesize [{}] {text:?}", voice.language_tag);

        let audio = self
            .retry
            .run(&label, move || backend.synthesize(text, voice))
            .await?;

        log::debug!(
            "{}: {} bytes for {text:?} ({})",
            backend.name(),
            audio.len(),
            voice.voice
        );
        Ok(audio)
    }
}

/// Mock speech backend for testing
///
/// Answers with a 16-bit mono WAV whose length grows with the text: 10ms of
/// a constant tone per character at 24kHz.
#[derive(Debug, Default)]
pub struct MockSpeechBackend {
    failures_left: AtomicUsize,
    always_fail: bool,
    failing_text: Option<String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, String)>>,
}

impl MockSpeechBackend {
    pub const SAMPLE_RATE: u32 = 24000;
    pub const SAMPLES_PER_CHAR: usize = 240;

    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `count` calls
    pub fn with_failures(self, count: usize) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    /// Fail every call
    pub fn always_failing() -> Self {
        Self {
            always_fail: true,
            ..Self::default()
        }
    }

    /// Fail every call whose text contains `needle`
    pub fn with_failing_text(mut self, needle: &str) -> Self {
        self.failing_text = Some(needle.to_string());
        self
    }

    /// Number of `synthesize` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(language_tag, text)` of every call, in call order
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Samples the mock produces for `text`
    pub fn samples_for(text: &str) -> usize {
        text.chars().count() * Self::SAMPLES_PER_CHAR
    }
}

#[async_trait]
impl SpeechBackend for MockSpeechBackend {
    async fn synthesize(&self, text: &str, voice: &VoiceProfile) -> Result<Vec<u8>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((voice.language_tag.clone(), text.to_string()));
        }

        let scheduled_failure = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        let text_failure = self
            .failing_text
            .as_deref()
            .is_some_and(|needle| text.contains(needle));
        if self.always_fail || scheduled_failure || text_failure {
            return Err(VocabcastError::SpeechSynthesis {
                message: format!("mock synthesis failure #{call}"),
            });
        }

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: Self::SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| VocabcastError::Other(format!("mock WAV writer: {e}")))?;
        for _ in 0..Self::samples_for(text) {
            writer
                .write_sample(1000i16)
                .map_err(|e| VocabcastError::Other(format!("mock WAV writer: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| VocabcastError::Other(format!("mock WAV writer: {e}")))?;
        Ok(cursor.into_inner())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
