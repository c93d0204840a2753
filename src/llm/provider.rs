use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::LLMConfig;
use crate::llm::google::GoogleAdapter;
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Client handle derived from a single credential.
pub struct LLM {
    adapter: Box<dyn LLMAdapter>,
    model: String,
}

impl LLM {
    /// Derive a Gemini client from the credential. An absent or blank
    /// credential yields no client.
    pub fn configure(credential: Option<&str>, config: &LLMConfig) -> AppResult<Option<Self>> {
        let Some(api_key) = credential.map(str::trim).filter(|k| !k.is_empty()) else {
            debug!("No credential configured, skipping client construction");
            return Ok(None);
        };

        let adapter = GoogleAdapter::new(api_key, config)?;
        info!(model = %config.model, "Configured Gemini client");

        Ok(Some(Self::with_adapter(Box::new(adapter), config.model.clone())))
    }

    pub fn with_adapter(adapter: Box<dyn LLMAdapter>, model: impl Into<String>) -> Self {
        Self {
            adapter,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }

    /// Send one prompt and return the generated text. Every failure is
    /// reported as `RequestFailed`.
    pub async fn generate(&self, prompt: &str) -> AppResult<String> {
        let request = LLMRequest::prompt(&self.model, prompt);

        match self.create_chat_completion(&request).await {
            Ok(response) => {
                debug!(
                    finish_reason = %response.finish_reason,
                    total_tokens = response.usage.total_tokens,
                    "Generation finished"
                );
                Ok(response.content)
            }
            Err(AppError::RequestFailed(msg)) => Err(AppError::RequestFailed(msg)),
            Err(other) => Err(AppError::RequestFailed(other.to_string())),
        }
    }
}
