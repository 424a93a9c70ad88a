//! Completion providers
//!
//! ## Architecture
//!
//! Real endpoints go through the `genai` crate, which handles the
//! provider-specific protocols (OpenAI, Anthropic, Gemini, etc.) and tool
//! calling. Providers not native to genai (Azure, OpenRouter, Mistral, or any
//! custom `api_base`) are reached with the OpenAI protocol via genai's
//! `ServiceTargetResolver`.
//!
//! Auth flows through our `SecretStore`, not genai's env var lookup.
//!
//! The `MockProvider` is used by tests.

mod traits;
mod error;
mod genai_adapter;
mod genai_provider;
mod mock;

pub use traits::{Provider, CompletionRequest};
pub use error::{ProviderError, ProviderResult};

pub use genai_provider::GenaiProvider;
pub use genai_adapter::{is_genai_native, is_genai_supported, ProviderConfig};

pub use mock::{MockProvider, MockMode};

use crate::logging::Logger;
use crate::secrets::SecretStore;
use std::sync::Arc;

/// Create a provider for the given provider ID
///
/// `mock` gives an echoing `MockProvider`; everything else goes through
/// `GenaiProvider`. An ID genai does not know keeps genai's own adapter
/// choice (picked from the model name) unless an `api_base` is set, which
/// switches it to the OpenAI protocol at that URL.
pub fn create_provider(
    provider_id: &str,
    secrets: Arc<dyn SecretStore>,
    logger: Arc<dyn Logger>,
) -> Box<dyn Provider> {
    match provider_id.to_lowercase().as_str() {
        "mock" => Box::new(MockProvider::echo(logger)),
        _ => Box::new(GenaiProvider::new(provider_id, secrets, logger)),
    }
}

/// List all supported provider IDs
pub fn supported_providers() -> Vec<&'static str> {
    vec![
        // Native genai providers
        "openai",
        "anthropic",
        "gemini",
        "ollama",
        "groq",
        "xai",
        "deepseek",
        "cohere",
        "fireworks",
        "together",
        // OpenAI-compatible providers via resolver
        "azure",
        "openrouter",
        "mistral",
        // Testing
        "mock",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::secrets::EnvSecretStore;

    #[test]
    fn test_create_provider() {
        let secrets: Arc<dyn SecretStore> = Arc::new(EnvSecretStore::new());
        assert_eq!(create_provider("Mock", secrets.clone(), Arc::new(NoOpLogger)).name(), "mock");
        assert_eq!(create_provider("openai", secrets, Arc::new(NoOpLogger)).name(), "openai");
    }

    #[test]
    fn test_supported_providers_are_handled() {
        for id in supported_providers() {
            assert!(id == "mock" || is_genai_supported(id), "{} is not routable", id);
        }
    }
}
