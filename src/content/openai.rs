//! OpenAI-compatible chat completions client.

use crate::config::GenerationConfig;
use crate::content::generator::TextGenerator;
use crate::error::{Result, VocabcastError};
use async_trait::async_trait;
use serde::Deserialize;

/// Chat completions client for [`TextGenerator`].
pub struct OpenAiChat {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, config: &GenerationConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.into(),
            model: config.model.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

fn generation_error(message: impl Into<String>) -> VocabcastError {
    VocabcastError::TextGeneration {
        message: message.into(),
    }
}

/// Extract the first choice's message content from a chat completions body.
fn parse_completion(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| generation_error(format!("Failed to parse chat response: {e}")))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| generation_error("Chat response has no message content"))
}

#[async_trait]
impl TextGenerator for OpenAiChat {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    { "role": "system", "content": system },
                    { "role": "user", "content": prompt },
                ],
            }))
            .send()
            .await
            .map_err(|e| generation_error(format!("Chat request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| generation_error(format!("Failed to read chat response: {e}")))?;

        if !status.is_success() {
            return Err(generation_error(format!(
                "Chat API returned status {status}: {}",
                body.trim()
            )));
        }

        parse_completion(&body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
