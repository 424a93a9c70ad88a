//! GenaiProvider - completion endpoint backed by the genai crate
//!
//! Handles all genai-native providers (OpenAI, Anthropic, Gemini, etc.) as well
//! as OpenAI-compatible endpoints (Azure, OpenRouter, Mistral, or any custom
//! `api_base`) via the ServiceTargetResolver.

use async_trait::async_trait;
use std::sync::Arc;

use genai::chat::ChatRequest;

use crate::logging::Logger;
use crate::secrets::SecretStore;
use crate::types::ChatMessage;

use super::error::{ProviderError, ProviderResult};
use super::genai_adapter::{
    create_client, from_genai_tool_call, is_genai_supported, requires_api_base, to_genai_messages,
    to_genai_options, to_genai_tools, ProviderConfig,
};
use super::traits::{CompletionRequest, Provider};

/// Completion provider for real LLM endpoints
pub struct GenaiProvider {
    provider_id: String,
    api_key: Option<String>,
    api_base: Option<String>,
    secrets: Arc<dyn SecretStore>,
    logger: Arc<dyn Logger>,
}

impl GenaiProvider {
    /// Create a provider that looks its API key up in `secrets`
    pub fn new(
        provider_id: impl Into<String>,
        secrets: Arc<dyn SecretStore>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            api_key: None,
            api_base: None,
            secrets,
            logger,
        }
    }

    /// Use this key instead of the secret store
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Send requests to a custom base URL
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Check if this provider can handle the given provider ID
    pub fn supports(provider_id: &str) -> bool {
        is_genai_supported(provider_id)
    }

    /// Extract model name from a model string (e.g., "openai/gpt-4" -> "gpt-4")
    pub fn extract_model_name(model: &str) -> &str {
        model.split_once('/').map_or(model, |(_, name)| name)
    }

    fn api_error(&self, message: impl Into<String>) -> ProviderError {
        ProviderError::api_error(self.provider_id.clone(), 500, message)
    }
}

#[async_trait]
impl Provider for GenaiProvider {
    fn name(&self) -> &str {
        &self.provider_id
    }

    async fn complete(&self, request: CompletionRequest) -> ProviderResult<ChatMessage> {
        if self.api_base.is_none() && requires_api_base(&self.provider_id) {
            return Err(ProviderError::MissingApiBase {
                provider: self.provider_id.clone(),
            });
        }

        let model_name = Self::extract_model_name(&request.model);
        self.logger.info(&format!(
            "[GenaiProvider] complete: provider={}, model={}, messages={}, tools={}",
            self.provider_id,
            model_name,
            request.messages.len(),
            request.tools.as_ref().map_or(0, Vec::len)
        ));

        let config = ProviderConfig {
            provider: self.provider_id.clone(),
            api_key: self.api_key.clone(),
            api_base: self.api_base.clone(),
        };
        let client = create_client(&config, Arc::clone(&self.secrets));

        let mut chat_req = ChatRequest::new(to_genai_messages(&request.messages)?);
        if let Some(tools) = request.tools.as_deref().filter(|t| !t.is_empty()) {
            chat_req = chat_req.with_tools(to_genai_tools(tools));
        }
        let options = to_genai_options(&request);

        let response = client
            .exec_chat(model_name, chat_req, Some(&options))
            .await
            .map_err(|e| {
                self.logger.error(&format!("[GenaiProvider] Request failed: {}", e));
                self.api_error(e.to_string())
            })?;

        let text = response.first_text().unwrap_or_default().to_string();
        let tool_calls: Vec<_> = response
            .into_tool_calls()
            .into_iter()
            .map(from_genai_tool_call)
            .collect();

        self.logger.debug(&format!(
            "[GenaiProvider] Reply: {} chars, {} tool call(s)",
            text.len(),
            tool_calls.len()
        ));

        if tool_calls.is_empty() {
            Ok(ChatMessage::assistant(text))
        } else {
            Ok(ChatMessage::assistant_with_tool_calls(text, tool_calls))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::secrets::MemorySecretStore;

    fn provider(id: &str) -> GenaiProvider {
        GenaiProvider::new(id, Arc::new(MemorySecretStore::new()), Arc::new(NoOpLogger))
    }

    #[test]
    fn test_extract_model_name() {
        assert_eq!(GenaiProvider::extract_model_name("openai/gpt-4"), "gpt-4");
        assert_eq!(
            GenaiProvider::extract_model_name("openrouter/meta-llama/llama-3-70b"),
            "meta-llama/llama-3-70b"
        );
        assert_eq!(GenaiProvider::extract_model_name("gpt-4"), "gpt-4");
    }

    #[test]
    fn test_supports() {
        assert!(GenaiProvider::supports("openai"));
        assert!(GenaiProvider::supports("anthropic"));
        assert!(GenaiProvider::supports("azure"));
        assert!(!GenaiProvider::supports("unknown_provider"));
    }

    #[test]
    fn test_builder() {
        let p = provider("openai")
            .with_api_key("sk-test")
            .with_api_base("http://localhost:4000/v1/");
        assert_eq!(p.name(), "openai");
        assert_eq!(p.api_key.as_deref(), Some("sk-test"));
        assert_eq!(p.api_base.as_deref(), Some("http://localhost:4000/v1/"));
    }

    #[tokio::test]
    async fn test_azure_without_base_fails_before_network() {
        let result = provider("azure")
            .complete(CompletionRequest::new("gpt-4o", vec![ChatMessage::user("hi")]))
            .await;
        assert!(matches!(result, Err(ProviderError::MissingApiBase { .. })));
    }
}
