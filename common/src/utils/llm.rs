use std::sync::Arc;

use async_openai::{
    config::OpenAIConfig,
    types::{ChatCompletionRequestMessage, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use tracing::debug;

use crate::{error::AppError, utils::config::AppConfig};

/// Narrow seam over a chat-capable model. Pipelines hand over fully
/// assembled messages and get plain text back, so any backend that speaks
/// the chat-completion shape can stand in (including test doubles).
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Identifier the backend was resolved under, used for logging.
    fn model_id(&self) -> &str;

    async fn complete(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<String, AppError>;
}

/// Production [`LanguageModel`] over an OpenAI-compatible chat endpoint.
/// The same type serves both the hosted API and locally served models; only
/// the client configuration differs.
pub struct ChatCompletionModel {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl ChatCompletionModel {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }

    /// Backend for the hosted API. The key is taken as configured; a missing
    /// key fails on the first call, not here.
    pub fn hosted(config: &AppConfig) -> Self {
        let client = Arc::new(Client::with_config(
            OpenAIConfig::new()
                .with_api_key(&config.openai_api_key)
                .with_api_base(&config.openai_base_url),
        ));
        Self::new(client, config.hosted_model.clone())
    }

    /// Backend for a locally served model behind an OpenAI-compatible
    /// endpoint. Reachability is not checked at construction time.
    pub fn local(config: &AppConfig, model: &str) -> Self {
        let client = Arc::new(Client::with_config(
            OpenAIConfig::new().with_api_base(&config.local_llm_base_url),
        ));
        Self::new(client, model.to_owned())
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionModel {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<String, AppError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(messages)
            .build()?;

        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                AppError::LLMParsing("Chat completion response contained no content".into())
            })?;

        debug!(model = %self.model, response_chars = content.len(), "Received chat completion");

        Ok(content)
    }
}
