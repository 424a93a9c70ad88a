//! mcpchat core
//!
//! Tool-augmented chat completion over MCP (Model Context Protocol) tool servers.
//! The library is runtime-agnostic apart from tokio: the host supplies a
//! completion provider, a logger and the list of tool servers.
//!
//! ## Chat loop
//!
//! The `chat` module starts every configured tool server, advertises their
//! tools to the model, executes the tool calls the model makes and feeds the
//! results back until the model answers in plain text:
//!
//! ```rust,ignore
//! use mcpchat_core::chat::ChatRunner;
//! use mcpchat_core::mcp::ServerParams;
//!
//! let runner = ChatRunner::new(provider, logger);
//! let servers = vec![ServerParams::stdio("mcp-server-ipinfo")];
//!
//! let mut conversation = vec![ChatMessage::user("Where is 8.8.8.8?")];
//! let reply = runner.run(&mut conversation, "openai/gpt-4o-mini", &servers).await?;
//! ```
//!
//! ## Tools
//!
//! The `tools` module translates tool names, converts tool descriptors into
//! completion-endpoint schemas and routes calls back to the owning server.

pub mod types;
pub mod secrets;
pub mod logging;
pub mod config;
pub mod providers;
pub mod tools;
pub mod mcp;
pub mod chat;

// Re-export commonly used types
pub use types::{
    ChatMessage, ContentPart, MessageRole, MessageContent,
    ToolDescriptor, ToolSchema, FunctionDefinition, ToolCall, ToolOutcome,
};

pub use secrets::{
    SecretStore, SecretStoreError, SecretStoreResult,
    EnvSecretStore, MemorySecretStore,
};

pub use logging::{Logger, NoOpLogger, ConsoleLogger};

pub use config::{ConfigProvider, ConfigError, MemoryConfigProvider, FileConfigProvider, DefaultSettings};

pub use providers::{Provider, ProviderError, CompletionRequest, GenaiProvider, MockProvider};

pub use tools::{translate, matches, Toolbox};

pub use mcp::{McpError, McpResult, ServerParams, ToolSession, SessionConnector, McpConnector};

pub use chat::{ChatRunner, ChatOptions, ChatError, ChatResult};
