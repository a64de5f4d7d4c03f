//! services/api/src/adapters/chat_llm.rs
//!
//! This module contains the adapter for the content-generation LLM.
//! It implements the `CompletionService` port from the `core` crate against
//! any OpenAI-compatible chat-completion endpoint; Perplexity and OpenAI
//! differ only in base URL and model id, which come from configuration.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use swipelearn_core::{
    ports::{CompletionService, GenerationError, GenerationResult},
    RenderedPrompt,
};

/// How many tokens the key-verification probe is allowed to spend.
const KEY_PROBE_MAX_TOKENS: u32 = 10;
const KEY_PROBE_MESSAGE: &str = "Hello, this is a test message.";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionService` against an OpenAI-compatible
/// chat-completion endpoint.
#[derive(Clone)]
pub struct ChatCompletionAdapter {
    client: Client<OpenAIConfig>,
    api_base: String,
    model: String,
}

impl ChatCompletionAdapter {
    /// Creates a new `ChatCompletionAdapter` for the given endpoint and key.
    /// The model here is only used for the key-verification probe; generation
    /// calls carry their model id inside the rendered prompt.
    pub fn new(api_key: &str, api_base: &str, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Self {
            client: Client::with_config(config),
            api_base: api_base.to_string(),
            model,
        }
    }
}

//=========================================================================================
// `CompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionService for ChatCompletionAdapter {
    /// Places the rendered prompt as a chat-completion call and returns the
    /// first choice's message content, or `"[]"` when the provider omitted it.
    async fn complete(&self, prompt: &RenderedPrompt) -> GenerationResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(prompt.system_instructions.clone())
                .build()
                .map_err(|e| GenerationError::ProviderUnavailable(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.user_message.clone())
                .build()
                .map_err(|e| GenerationError::ProviderUnavailable(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&prompt.model_id)
            .messages(messages)
            .temperature(prompt.temperature)
            .max_tokens(prompt.max_output_tokens)
            .build()
            .map_err(|e| GenerationError::ProviderUnavailable(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| GenerationError::ProviderUnavailable(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        // A missing content field becomes an empty JSON array, which the
        // interpreter reports as an empty result.
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_else(|| "[]".to_string());

        Ok(content)
    }

    /// Probes the endpoint with a throwaway client built around the supplied
    /// key. An API-level rejection means the key is invalid; anything else
    /// (network failure, bad gateway) is a provider error.
    async fn verify_api_key(&self, api_key: &str) -> GenerationResult<bool> {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&self.api_base);
        let client: Client<OpenAIConfig> = Client::with_config(config);

        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(KEY_PROBE_MESSAGE)
            .build()
            .map_err(|e| GenerationError::ProviderUnavailable(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(KEY_PROBE_MAX_TOKENS)
            .build()
            .map_err(|e| GenerationError::ProviderUnavailable(e.to_string()))?;

        match client.chat().create(request).await {
            Ok(_) => Ok(true),
            Err(OpenAIError::ApiError(_)) => Ok(false),
            Err(e) => Err(GenerationError::ProviderUnavailable(e.to_string())),
        }
    }
}
