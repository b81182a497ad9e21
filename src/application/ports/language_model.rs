use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LanguageModelError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Model returned no text")]
    EmptyResponse,
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub content: String,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LanguageModelError>;

    fn model_name(&self) -> &str;
}
