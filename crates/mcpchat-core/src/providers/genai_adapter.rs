//! Adapter between mcpchat types and genai types
//!
//! Auth flows through our `SecretStore`, not genai's default env var lookup.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions as GenaiOptions, Tool as GenaiTool,
    ToolCall as GenaiToolCall, ToolResponse as GenaiToolResponse,
};
use genai::resolver::{AuthData, AuthResolver, Endpoint, ServiceTargetResolver};
use genai::{adapter::AdapterKind, Client, ModelIden, ServiceTarget};
use serde_json::{json, Value};

use crate::secrets::SecretStore;
use crate::types::{ChatMessage, MessageRole, ToolCall, ToolSchema};

use super::error::ProviderResult;
use super::traits::CompletionRequest;

// ============================================================================
// Message Conversion: mcpchat -> genai
// ============================================================================

/// Convert one conversation message
///
/// Assistant messages that request tools become genai tool-call messages,
/// preceded by a plain assistant message when the model also wrote text.
/// Tool messages become genai tool responses.
pub fn to_genai_message(msg: &ChatMessage) -> ProviderResult<Vec<GenaiMessage>> {
    let text = msg.content.to_text();

    let converted = match msg.role {
        MessageRole::System => vec![GenaiMessage::system(text)],
        MessageRole::User => vec![GenaiMessage::user(text)],
        MessageRole::Assistant if msg.has_tool_calls() => {
            let calls = msg
                .tool_calls
                .iter()
                .map(to_genai_tool_call)
                .collect::<ProviderResult<Vec<_>>>()?;

            let mut messages = Vec::with_capacity(2);
            if !text.trim().is_empty() {
                messages.push(GenaiMessage::assistant(text));
            }
            messages.push(GenaiMessage::from(calls));
            messages
        }
        MessageRole::Assistant => vec![GenaiMessage::assistant(text)],
        MessageRole::Tool => {
            let call_id = msg.tool_call_id.clone().unwrap_or_default();
            vec![GenaiMessage::from(GenaiToolResponse::new(call_id, text))]
        }
    };

    Ok(converted)
}

/// Convert the whole conversation
pub fn to_genai_messages(messages: &[ChatMessage]) -> ProviderResult<Vec<GenaiMessage>> {
    let mut converted = Vec::with_capacity(messages.len());
    for msg in messages {
        converted.extend(to_genai_message(msg)?);
    }
    Ok(converted)
}

/// Convert a requested tool call back into genai's form
///
/// Arguments that are not valid JSON are passed on as a JSON string.
pub fn to_genai_tool_call(call: &ToolCall) -> ProviderResult<GenaiToolCall> {
    let arguments = serde_json::from_str::<Value>(&call.arguments)
        .unwrap_or_else(|_| Value::String(call.arguments.clone()));

    let tool_call = serde_json::from_value(json!({
        "call_id": call.id,
        "fn_name": call.name,
        "fn_arguments": arguments,
    }))?;
    Ok(tool_call)
}

// ============================================================================
// Tool Conversion: mcpchat -> genai
// ============================================================================

/// Convert an endpoint tool schema to a genai tool
pub fn to_genai_tool(schema: &ToolSchema) -> GenaiTool {
    GenaiTool::new(schema.function.name.clone())
        .with_description(schema.function.description.clone())
        .with_schema(schema.function.parameters.clone())
}

pub fn to_genai_tools(schemas: &[ToolSchema]) -> Vec<GenaiTool> {
    schemas.iter().map(to_genai_tool).collect()
}

// ============================================================================
// Options Conversion
// ============================================================================

pub fn to_genai_options(request: &CompletionRequest) -> GenaiOptions {
    let mut genai_opts = GenaiOptions::default();

    if let Some(temp) = request.temperature {
        genai_opts = genai_opts.with_temperature(temp as f64);
    }

    if let Some(max_tokens) = request.max_tokens {
        genai_opts = genai_opts.with_max_tokens(max_tokens);
    }

    genai_opts
}

// ============================================================================
// Response Conversion: genai -> mcpchat
// ============================================================================

/// Convert a genai tool call, re-encoding structured arguments as JSON text
pub fn from_genai_tool_call(tc: GenaiToolCall) -> ToolCall {
    let arguments = match tc.fn_arguments {
        Value::String(raw) => raw,
        other => other.to_string(),
    };
    ToolCall::new(tc.call_id, tc.fn_name, arguments)
}

// ============================================================================
// Provider Resolution
// ============================================================================

/// Provider configuration for routing
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider identifier (e.g., "openai", "azure", "openrouter")
    pub provider: String,
    /// Explicit API key; wins over the secret store
    pub api_key: Option<String>,
    /// Custom API base URL
    pub api_base: Option<String>,
}

/// Create a genai Client with custom auth and endpoint resolution
///
/// Auth: the explicit key if set, else `secrets.get(provider)`, else none
/// (fine for keyless endpoints such as Ollama).
///
/// Endpoint: a custom `api_base` overrides the endpoint; non-native providers
/// are spoken to with the OpenAI protocol.
pub fn create_client(config: &ProviderConfig, secrets: Arc<dyn SecretStore>) -> Client {
    let auth_provider = config.provider.clone();
    let auth_explicit_key = config.api_key.clone();

    let auth_resolver = AuthResolver::from_resolver_async_fn(
        move |_model_iden: ModelIden| -> Pin<Box<dyn Future<Output = genai::resolver::Result<Option<AuthData>>> + Send>> {
            let provider = auth_provider.clone();
            let explicit_key = auth_explicit_key.clone();
            let secrets = Arc::clone(&secrets);

            Box::pin(async move {
                if let Some(key) = explicit_key {
                    return Ok(Some(AuthData::from_single(key)));
                }
                Ok(secrets.get(&provider).map(AuthData::from_single))
            })
        },
    );

    let target_provider = config.provider.to_lowercase();
    let target_api_base = config.api_base.clone();

    let target_resolver = ServiceTargetResolver::from_resolver_fn(
        move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            let native = is_genai_native(&target_provider);

            let endpoint = match (target_provider.as_str(), &target_api_base) {
                (_, Some(base)) => Endpoint::from_owned(base.clone()),
                ("openrouter", None) => Endpoint::from_static("https://openrouter.ai/api/v1/"),
                ("mistral", None) => Endpoint::from_static("https://api.mistral.ai/v1/"),
                // Native providers without overrides resolve normally
                _ => return Ok(target),
            };

            let adapter_kind = if native {
                target.model.adapter_kind
            } else {
                AdapterKind::OpenAI
            };

            Ok(ServiceTarget {
                endpoint,
                auth: target.auth,
                model: ModelIden::new(adapter_kind, target.model.model_name.clone()),
            })
        },
    );

    Client::builder()
        .with_auth_resolver(auth_resolver)
        .with_service_target_resolver(target_resolver)
        .build()
}

/// Check if a provider is natively supported by genai
pub fn is_genai_native(provider: &str) -> bool {
    matches!(
        provider.to_lowercase().as_str(),
        "openai"
            | "anthropic"
            | "gemini"
            | "ollama"
            | "groq"
            | "xai"
            | "deepseek"
            | "cohere"
            | "fireworks"
            | "together"
    )
}

/// Providers reached through the OpenAI protocol that have no usable default endpoint
pub fn requires_api_base(provider: &str) -> bool {
    matches!(provider.to_lowercase().as_str(), "azure")
}

/// Check if a provider can be handled by genai (native or via OpenAI-compat)
pub fn is_genai_supported(provider: &str) -> bool {
    is_genai_native(provider)
        || matches!(
            provider.to_lowercase().as_str(),
            "azure" | "openrouter" | "mistral"
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use genai::chat::ChatRole as GenaiRole;

    #[test]
    fn test_message_conversion() {
        let genai_msgs = to_genai_message(&ChatMessage::user("Hello, world!")).unwrap();
        assert_eq!(genai_msgs.len(), 1);
        assert!(matches!(genai_msgs[0].role, GenaiRole::User));

        let genai_msgs = to_genai_message(&ChatMessage::system("Be brief")).unwrap();
        assert!(matches!(genai_msgs[0].role, GenaiRole::System));
    }

    #[test]
    fn test_tool_messages_conversion() {
        let request = ChatMessage::assistant_with_tool_calls(
            "",
            vec![ToolCall::new("call_1", "calc_add", r#"{"a":2,"b":2}"#)],
        );
        let genai_msgs = to_genai_message(&request).unwrap();
        assert_eq!(genai_msgs.len(), 1);
        assert!(matches!(genai_msgs[0].role, GenaiRole::Assistant));

        let answer = to_genai_message(&ChatMessage::tool("call_1", "4")).unwrap();
        assert!(matches!(answer[0].role, GenaiRole::Tool));
    }

    #[test]
    fn test_text_alongside_tool_calls_is_kept() {
        let request = ChatMessage::assistant_with_tool_calls(
            "Let me add those up.",
            vec![ToolCall::new("call_1", "calc_add", r#"{"a":2,"b":2}"#)],
        );
        let conversation = vec![
            ChatMessage::user("What is 2 + 2?"),
            request,
            ChatMessage::tool("call_1", "4"),
        ];

        let genai_msgs = to_genai_messages(&conversation).unwrap();
        assert_eq!(genai_msgs.len(), 4);
        assert!(matches!(genai_msgs[1].role, GenaiRole::Assistant));
        assert_eq!(genai_msgs[1].content.first_text(), Some("Let me add those up."));
        assert!(matches!(genai_msgs[2].role, GenaiRole::Assistant));
        assert!(matches!(genai_msgs[3].role, GenaiRole::Tool));
    }

    #[test]
    fn test_tool_call_arguments_round_trip_as_text() {
        let call = ToolCall::new("call_7", "calc_add", r#"{"a":2,"b":2}"#);
        let back = from_genai_tool_call(to_genai_tool_call(&call).unwrap());
        assert_eq!(back.id, "call_7");
        assert_eq!(back.name, "calc_add");
        assert_eq!(back.decode_arguments().unwrap(), json!({"a": 2, "b": 2}));

        // Malformed arguments survive unchanged so decoding can reject them later
        let broken = ToolCall::new("call_8", "calc_add", "{not json");
        let back = from_genai_tool_call(to_genai_tool_call(&broken).unwrap());
        assert_eq!(back.arguments, "{not json");
    }

    #[test]
    fn test_tool_conversion() {
        let schema = ToolSchema::function(
            "get_weather",
            "Get weather for a location",
            json!({"type": "object", "properties": {"location": {"type": "string"}}, "required": []}),
        );

        let genai_tool = to_genai_tool(&schema);
        assert_eq!(genai_tool.name, "get_weather");
    }

    #[test]
    fn test_options_conversion() {
        let request = CompletionRequest::new("gpt-4o", vec![])
            .with_temperature(0.2)
            .with_max_tokens(256);
        let opts = to_genai_options(&request);
        assert_eq!(opts.max_tokens, Some(256));
    }

    #[test]
    fn test_provider_detection() {
        assert!(is_genai_native("openai"));
        assert!(is_genai_native("Anthropic"));
        assert!(!is_genai_native("azure"));

        assert!(is_genai_supported("azure"));
        assert!(is_genai_supported("openrouter"));
        assert!(is_genai_supported("mistral"));
        assert!(!is_genai_supported("unknown_provider"));

        assert!(requires_api_base("azure"));
        assert!(!requires_api_base("openai"));
    }

    fn client_for(provider: &str, api_base: Option<&str>) -> Client {
        let config = ProviderConfig {
            provider: provider.to_string(),
            api_key: Some("sk-test".to_string()),
            api_base: api_base.map(str::to_string),
        };
        create_client(&config, Arc::new(crate::secrets::MemorySecretStore::new()))
    }

    #[tokio::test]
    async fn test_unknown_provider_keeps_genai_adapter() {
        let target = client_for("acme", None)
            .resolve_service_target("claude-3-5-haiku-latest")
            .await
            .unwrap();
        assert_eq!(target.model.adapter_kind, AdapterKind::Anthropic);
    }

    #[tokio::test]
    async fn test_api_base_switches_to_openai_protocol() {
        let target = client_for("acme", Some("http://localhost:8080/v1/"))
            .resolve_service_target("claude-3-5-haiku-latest")
            .await
            .unwrap();
        assert_eq!(target.model.adapter_kind, AdapterKind::OpenAI);
        assert_eq!(target.endpoint.base_url(), "http://localhost:8080/v1/");
    }

    #[tokio::test]
    async fn test_openrouter_uses_its_endpoint() {
        let target = client_for("openrouter", None)
            .resolve_service_target("claude-3-5-haiku-latest")
            .await
            .unwrap();
        assert_eq!(target.model.adapter_kind, AdapterKind::OpenAI);
        assert_eq!(target.endpoint.base_url(), "https://openrouter.ai/api/v1/");
    }
}
