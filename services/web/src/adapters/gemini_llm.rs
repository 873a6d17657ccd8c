//! services/web/src/adapters/gemini_llm.rs
//!
//! This module contains the adapter for the text-generation LLM.
//! It implements the `TextGenerationService` port from the `core` crate by
//! talking to Gemini through its OpenAI-compatible chat completions endpoint.

use crate::config::Config;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::time::Instant;
use study_planner_core::ports::{PortError, PortResult, TextGenerationService};
use tracing::{error, info};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct GeminiGenerationAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GeminiGenerationAdapter {
    /// Creates a new `GeminiGenerationAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Builds the client from the API key, base URL and model in `config`.
    pub fn from_config(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.google_api_key.clone())
            .with_api_base(config.gemini_api_base.clone());
        Self::new(Client::with_config(openai_config), config.gemini_model.clone())
    }
}

//=========================================================================================
// `TextGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextGenerationService for GeminiGenerationAdapter {
    async fn generate(&self, prompt: &str) -> PortResult<String> {
        let message: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into();
        let messages = vec![message];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let started = Instant::now();
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| {
                error!("Generation request to {} failed: {}", self.model, e);
                PortError::Unexpected(e.to_string())
            })?;
        info!("⏱️ {} took: {:?}", self.model, started.elapsed());

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(PortError::EmptyResponse)
    }
}
