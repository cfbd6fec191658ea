//! OpenAI-compatible `/audio/speech` client.

use crate::audio::OutputFormat;
use crate::config::SpeechConfig;
use crate::error::{Result, VocabcastError};
use crate::speech::synthesizer::SpeechBackend;
use crate::speech::voice::VoiceProfile;
use async_trait::async_trait;
use serde::Serialize;

pub struct OpenAiSpeech {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
}

impl OpenAiSpeech {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, config: &SpeechConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.into(),
            model: config.model.clone(),
            format: config.response_format,
        }
    }

    fn request<'a>(&'a self, text: &'a str, voice: &'a VoiceProfile) -> SpeechRequest<'a> {
        SpeechRequest {
            model: &self.model,
            voice: &voice.voice,
            input: text,
            response_format: self.format.extension(),
        }
    }
}

fn synthesis_error(message: impl Into<String>) -> VocabcastError {
    VocabcastError::SpeechSynthesis {
        message: message.into(),
    }
}

#[async_trait]
impl SpeechBackend for OpenAiSpeech {
    async fn synthesize(&self, text: &str, voice: &VoiceProfile) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request(text, voice))
            .send()
            .await
            .map_err(|e| synthesis_error(format!("Speech request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(synthesis_error(format!(
                "Speech API returned status {status}: {}",
                body.trim()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| synthesis_error(format!("Failed to read speech response: {e}")))?;
        if bytes.is_empty() {
            return Err(synthesis_error("Speech API returned no audio"));
        }
        Ok(bytes.to_vec())
    }

    fn name(&self) -> &str {
        "openai"
    }
}
