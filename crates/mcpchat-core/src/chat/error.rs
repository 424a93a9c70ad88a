//! Chat loop errors

use thiserror::Error;

use crate::config::ConfigError;
use crate::mcp::McpError;
use crate::providers::ProviderError;

/// Fatal failures of one chat invocation
///
/// Tool-level problems (unknown tool, failed execution) are not errors: they
/// are reported back to the model as tool message content.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Tool servers could not be started or listed
    #[error("Tool servers unavailable: {0}")]
    Session(#[from] McpError),

    /// The completion endpoint failed
    #[error("Completion failed: {0}")]
    Provider(#[from] ProviderError),

    /// The model sent tool arguments that are not valid JSON
    #[error("Invalid arguments for tool {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    /// The model kept requesting tools past the configured limit
    #[error("Gave up after {0} completion requests")]
    TurnLimitExceeded(u32),

    /// Configuration could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type ChatResult<T> = Result<T, ChatError>;
