//! MCP session using the official rmcp SDK
//!
//! Starts stdio servers as child processes, or connects over streamable HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::{
    ServiceExt,
    model::{CallToolRequestParams, CallToolResult, ClientCapabilities, ClientInfo, Implementation, Tool},
    service::RunningService,
    transport::{StreamableHttpClientTransport, TokioChildProcess},
    RoleClient,
};
use serde_json::Value;
use tokio::process::Command;

use crate::logging::Logger;
use crate::types::{ToolDescriptor, ToolOutcome};

use super::error::{McpError, McpResult};
use super::params::{ServerParams, ServerTransport};
use super::session::{SessionConnector, ToolSession};

/// MCP client session for one tool server
///
/// The underlying service is started by [`ToolSession::initialize`]. If the
/// session is dropped without being closed, rmcp cancels the service itself.
pub struct McpSession {
    params: ServerParams,
    /// The underlying rmcp running service, present once initialized
    client: Option<RunningService<RoleClient, ClientInfo>>,
    logger: Arc<dyn Logger>,
}

impl McpSession {
    /// Create a session for `params`; nothing is started yet
    pub fn new(params: ServerParams, logger: Arc<dyn Logger>) -> Self {
        Self {
            params,
            client: None,
            logger,
        }
    }

    /// Whether the handshake has completed
    pub fn is_initialized(&self) -> bool {
        self.client.is_some()
    }

    /// Get server info reported during the handshake
    pub fn server_info(&self) -> Option<&Implementation> {
        self.client
            .as_ref()
            .and_then(|c| c.peer_info())
            .map(|info| &info.server_info)
    }

    fn running(&self) -> McpResult<&RunningService<RoleClient, ClientInfo>> {
        self.client
            .as_ref()
            .ok_or_else(|| McpError::NotInitialized(self.params.label().to_string()))
    }

    async fn connect(&self) -> McpResult<RunningService<RoleClient, ClientInfo>> {
        let label = self.params.label();

        match &self.params.transport {
            ServerTransport::Stdio { command, args, env, cwd } => {
                self.logger.info(&format!(
                    "[McpSession] Starting stdio server '{}': {} {}",
                    label,
                    command,
                    args.join(" ")
                ));

                let mut cmd = Command::new(command);
                cmd.args(args).envs(env);
                if let Some(dir) = cwd {
                    cmd.current_dir(dir);
                }

                let transport = TokioChildProcess::new(cmd)
                    .map_err(|e| McpError::ConnectionFailed(format!("{}: {}", label, e)))?;

                client_info()
                    .serve(transport)
                    .await
                    .map_err(|e| McpError::InitializationFailed(format!("{}: {}", label, e)))
            }
            ServerTransport::Http { url } => {
                self.logger.info(&format!(
                    "[McpSession] Connecting to HTTP server '{}': {}",
                    label, url
                ));

                let transport = StreamableHttpClientTransport::from_uri(url.as_str());

                client_info()
                    .serve(transport)
                    .await
                    .map_err(|e| McpError::InitializationFailed(format!("{}: {}", label, e)))
            }
        }
    }
}

#[async_trait]
impl ToolSession for McpSession {
    fn name(&self) -> &str {
        self.params.label()
    }

    async fn initialize(&mut self) -> McpResult<()> {
        if self.client.is_some() {
            return Ok(());
        }

        let client = self.connect().await?;
        self.client = Some(client);
        self.logger.info(&format!(
            "[McpSession] '{}' connected and initialized",
            self.params.label()
        ));
        Ok(())
    }

    async fn list_tools(&self) -> McpResult<Vec<ToolDescriptor>> {
        let tools = self
            .running()?
            .list_all_tools()
            .await
            .map_err(|e| McpError::Protocol(e.to_string()))?;

        self.logger.info(&format!(
            "[McpSession] '{}' listed {} tools",
            self.params.label(),
            tools.len()
        ));

        Ok(tools.into_iter().map(to_descriptor).collect())
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> McpResult<ToolOutcome> {
        self.logger.info(&format!(
            "[McpSession] '{}' calling tool: {}",
            self.params.label(),
            name
        ));

        let params = CallToolRequestParams {
            meta: None,
            name: name.to_owned().into(),
            arguments: arguments.as_object().cloned(),
            task: None,
        };

        let result = self
            .running()?
            .call_tool(params)
            .await
            .map_err(|e| McpError::ToolCallFailed(e.to_string()))?;

        to_outcome(result)
    }

    async fn close(&mut self) -> McpResult<()> {
        if let Some(client) = self.client.take() {
            self.logger.info(&format!(
                "[McpSession] Closing '{}'",
                self.params.label()
            ));
            client
                .cancel()
                .await
                .map_err(|e| McpError::Protocol(e.to_string()))?;
        }
        Ok(())
    }
}

/// Connector that builds [`McpSession`]s
pub struct McpConnector {
    logger: Arc<dyn Logger>,
}

impl McpConnector {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl SessionConnector for McpConnector {
    fn open(&self, params: &ServerParams) -> McpResult<Box<dyn ToolSession>> {
        Ok(Box::new(McpSession::new(params.clone(), Arc::clone(&self.logger))))
    }
}

fn client_info() -> ClientInfo {
    ClientInfo {
        meta: None,
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "mcpchat-core".to_string(),
            title: Some("mcpchat".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            website_url: None,
            icons: None,
        },
    }
}

fn to_descriptor(tool: Tool) -> ToolDescriptor {
    ToolDescriptor {
        name: tool.name.to_string(),
        description: tool.description.map(|d| d.to_string()),
        input_schema: Some(Value::Object(tool.input_schema.as_ref().clone())),
    }
}

fn to_outcome(result: CallToolResult) -> McpResult<ToolOutcome> {
    let content = serde_json::to_value(&result.content)
        .map_err(|e| McpError::Protocol(format!("Unreadable tool content: {}", e)))?;

    Ok(ToolOutcome {
        is_error: result.is_error.unwrap_or(false),
        content,
    })
}
