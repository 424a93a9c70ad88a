//! Provider trait definition

use async_trait::async_trait;

use crate::types::{ChatMessage, ToolSchema};
use super::error::ProviderResult;

/// One chat-completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier, optionally prefixed with the provider ("openai/gpt-4o")
    pub model: String,
    /// Full conversation so far
    pub messages: Vec<ChatMessage>,
    /// Tools the model may call; `None` sends no tool list at all
    pub tools: Option<Vec<ToolSchema>>,
    /// Temperature for response generation (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Attach the tool list
    pub fn with_tools(mut self, tools: Vec<ToolSchema>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

/// A chat-completion endpoint
///
/// Implementations:
/// - `GenaiProvider`: real endpoints through the genai crate
/// - `MockProvider`: scripted replies for tests
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name (e.g., "openai", "mock")
    fn name(&self) -> &str;

    /// Request one assistant reply for the conversation
    ///
    /// The reply may carry tool calls; their arguments are JSON text exactly
    /// as the endpoint produced them.
    async fn complete(&self, request: CompletionRequest) -> ProviderResult<ChatMessage>;
}
