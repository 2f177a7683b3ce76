use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::clients::traits::{GenerationError, GenerationRequest, TextGenerator};
use crate::config::{Config, GenerationConfig};
use crate::error::{OracleError, Result};

/// Chat-completions client for OpenAI and API-compatible endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    endpoint: String,
    model: String,
    api_key: String,
    client: Client,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, generation: &GenerationConfig) -> Result<Self> {
        let base = generation.base_url.trim_end_matches('/');
        // Accept either the API root or the full completions URL
        let endpoint = if base.ends_with("/chat/completions") {
            base.to_string()
        } else {
            format!("{}/chat/completions", base)
        };

        let client = Client::builder()
            .timeout(Duration::from_millis(generation.timeout_ms))
            .build()
            .map_err(|e| OracleError::Config {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            endpoint,
            model: generation.model.clone(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Build a client when a credential is configured. `Ok(None)` means the
    /// service runs with fallback narratives only.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        match config.runtime.openai_api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {
                Ok(Some(Self::new(key.trim(), &config.generation)?))
            }
            _ => Ok(None),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Pull the first choice's message content out of a chat-completions body.
pub fn extract_content(body: &Value) -> std::result::Result<String, GenerationError> {
    let choice = body
        .get("choices")
        .and_then(|c| c.get(0))
        .ok_or_else(|| GenerationError::ParseError("response has no choices".to_string()))?;
    let content = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| GenerationError::ParseError("choice has no message content".to_string()))?
        .trim();

    if content.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(content.to_string())
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<String, GenerationError> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": request.prompt}
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature
        });

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let text = res
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(GenerationError::Provider {
                status: status.as_u16(),
                body: text,
            });
        }

        let response_json: Value = res
            .json()
            .await
            .map_err(|e| GenerationError::ParseError(e.to_string()))?;

        extract_content(&response_json)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
