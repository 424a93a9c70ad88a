//! Configuration provider trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::mcp::ServerParams;

/// Configuration source for tool servers and chat defaults
///
/// Implementations:
/// - `MemoryConfigProvider`: In-memory for testing
/// - `FileConfigProvider`: YAML file (~/.config/mcpchat/config.yaml)
///
/// Servers are addressed by their label: the explicit `name`, else the
/// command or URL. Label comparison is case-insensitive.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Configured tool servers, in order
    async fn get_servers(&self) -> ConfigResult<Vec<ServerParams>>;

    /// Append a tool server
    async fn add_server(&self, server: ServerParams) -> ConfigResult<()>;

    /// Replace the tool server with the given label
    async fn update_server(&self, name: &str, server: ServerParams) -> ConfigResult<()>;

    /// Remove the tool server with the given label
    async fn remove_server(&self, name: &str) -> ConfigResult<()>;

    /// Default provider, model and loop settings
    async fn get_defaults(&self) -> ConfigResult<DefaultSettings>;
}

/// Defaults applied when the caller does not say otherwise
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultSettings {
    /// Completion provider id (e.g. "openai")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Model name, optionally prefixed with the provider ("openai/gpt-4o")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Maximum completion requests per invocation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<u32>,
    /// Custom base URL for an OpenAI-compatible endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Server not found: {0}")]
    ServerNotFound(String),

    #[error("Server already exists: {0}")]
    ServerExists(String),

    #[error("Configured servers are not a list")]
    InvalidServers,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Other(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

pub(crate) fn same_label(server: &ServerParams, name: &str) -> bool {
    server.label().to_lowercase() == name.to_lowercase()
}
