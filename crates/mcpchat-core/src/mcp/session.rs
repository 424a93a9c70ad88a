//! Tool session abstractions

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{ToolDescriptor, ToolOutcome};

use super::error::McpResult;
use super::params::ServerParams;

/// A live connection to one tool server
///
/// Implementations:
/// - `McpSession`: real MCP server over stdio or streamable HTTP (rmcp)
/// - `MockSession`: scripted server for tests
#[async_trait]
pub trait ToolSession: Send + Sync {
    /// Display name of the server behind this session
    fn name(&self) -> &str;

    /// Perform the protocol handshake
    ///
    /// Calling this on an already initialized session is a no-op.
    async fn initialize(&mut self) -> McpResult<()>;

    /// List the tools the server exposes
    async fn list_tools(&self) -> McpResult<Vec<ToolDescriptor>>;

    /// Call a tool by its native name
    ///
    /// A tool that ran but failed is reported through `ToolOutcome::is_error`;
    /// `Err` means the call never produced a result.
    async fn call_tool(&self, name: &str, arguments: Value) -> McpResult<ToolOutcome>;

    /// Shut the session down. Closing twice is a no-op.
    async fn close(&mut self) -> McpResult<()>;
}

/// Creates (uninitialized) sessions from connection parameters
pub trait SessionConnector: Send + Sync {
    /// Build a session for `params` without starting it
    fn open(&self, params: &ServerParams) -> McpResult<Box<dyn ToolSession>>;
}
