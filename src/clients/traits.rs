use async_trait::async_trait;
use thiserror::Error;

/// A single-turn completion request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("text generation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("http error: {0}")]
    Http(String),
    #[error("provider returned {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("provider returned an empty completion")]
    Empty,
    #[error("generation task failed: {0}")]
    Aborted(String),
}

/// Anything that can turn a prompt into free text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Model identifier, reported by `/info`.
    fn model(&self) -> &str;
}
