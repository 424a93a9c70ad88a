//! The completion loop

use std::sync::Arc;

use serde_json::Value;

use crate::config::ConfigProvider;
use crate::logging::Logger;
use crate::mcp::{McpConnector, ServerParams, SessionConnector};
use crate::providers::{CompletionRequest, Provider};
use crate::tools::Toolbox;
use crate::types::{ChatMessage, ToolCall, ToolSchema};

use super::error::{ChatError, ChatResult};
use super::ChatOptions;

/// Runs tool-augmented chat completions
pub struct ChatRunner {
    provider: Arc<dyn Provider>,
    connector: Arc<dyn SessionConnector>,
    options: ChatOptions,
    logger: Arc<dyn Logger>,
}

impl ChatRunner {
    /// Create a runner that starts real MCP servers
    pub fn new(provider: Arc<dyn Provider>, logger: Arc<dyn Logger>) -> Self {
        Self {
            provider,
            connector: Arc::new(McpConnector::new(Arc::clone(&logger))),
            options: ChatOptions::default(),
            logger,
        }
    }

    /// Use a different way of opening tool sessions
    pub fn with_connector(mut self, connector: Arc<dyn SessionConnector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ChatOptions {
        &self.options
    }

    /// Run one invocation against `servers`
    ///
    /// Every assistant reply and tool result is appended to `conversation`,
    /// and the final assistant reply (the one without tool calls) is returned.
    ///
    /// With no servers, a single completion request is sent without a tool
    /// list and nothing is appended.
    ///
    /// Tool sessions live for this call only and are closed, newest first,
    /// before it returns, whether it succeeds or fails.
    pub async fn run(
        &self,
        conversation: &mut Vec<ChatMessage>,
        model: &str,
        servers: &[ServerParams],
    ) -> ChatResult<ChatMessage> {
        if servers.is_empty() {
            self.logger.info("[ChatRunner] No tool servers configured, sending a plain completion");
            let mut turns = 0;
            return self.complete(conversation, model, None, &mut turns).await;
        }

        let toolbox = Toolbox::assemble(self.connector.as_ref(), servers, Arc::clone(&self.logger)).await?;
        let result = self.drive(conversation, model, &toolbox).await;
        toolbox.close().await;

        if let Err(e) = &result {
            self.logger.error(&format!("[ChatRunner] Invocation failed: {}", e));
        }
        result
    }

    /// Run one invocation against the servers configured in `config`
    pub async fn run_configured(
        &self,
        conversation: &mut Vec<ChatMessage>,
        model: &str,
        config: &dyn ConfigProvider,
    ) -> ChatResult<ChatMessage> {
        let servers = config.get_servers().await?;
        self.run(conversation, model, &servers).await
    }

    async fn drive(
        &self,
        conversation: &mut Vec<ChatMessage>,
        model: &str,
        toolbox: &Toolbox,
    ) -> ChatResult<ChatMessage> {
        let schemas = toolbox.schemas().to_vec();
        let mut turns = 0;

        let mut reply = self
            .complete(conversation, model, Some(schemas.as_slice()), &mut turns)
            .await?;
        conversation.push(reply.clone());

        while reply.has_tool_calls() {
            self.logger.debug(&format!(
                "[ChatRunner] Turn {}: {} tool call(s)",
                turns,
                reply.tool_calls.len()
            ));

            for call in &reply.tool_calls {
                let content = self.dispatch(toolbox, call).await?;
                conversation.push(ChatMessage::tool(call.id.clone(), content));
            }

            reply = self
                .complete(conversation, model, Some(schemas.as_slice()), &mut turns)
                .await?;
            conversation.push(reply.clone());
        }

        Ok(reply)
    }

    async fn complete(
        &self,
        conversation: &[ChatMessage],
        model: &str,
        tools: Option<&[ToolSchema]>,
        turns: &mut u32,
    ) -> ChatResult<ChatMessage> {
        if let Some(limit) = self.options.max_turns {
            if *turns >= limit {
                return Err(ChatError::TurnLimitExceeded(limit));
            }
        }
        *turns += 1;

        let mut request = CompletionRequest::new(model, conversation.to_vec());
        if let Some(tools) = tools {
            request = request.with_tools(tools.to_vec());
        }
        if let Some(temp) = self.options.temperature {
            request = request.with_temperature(temp);
        }
        if let Some(max_tokens) = self.options.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        Ok(self.provider.complete(request).await?)
    }

    /// Execute one tool call and produce the tool message content
    ///
    /// Only malformed arguments are fatal. Unknown tools and failed executions
    /// are described to the model instead.
    async fn dispatch(&self, toolbox: &Toolbox, call: &ToolCall) -> ChatResult<String> {
        let arguments = call.decode_arguments().map_err(|source| {
            self.logger.error(&format!(
                "[ChatRunner] Arguments for '{}' are not valid JSON: {}",
                call.name, source
            ));
            ChatError::InvalidArguments {
                tool: call.name.clone(),
                source,
            }
        })?;

        let Some((route, session)) = toolbox.resolve(&call.name) else {
            self.logger.warn(&format!("[ChatRunner] Model requested unknown tool '{}'", call.name));
            return Ok(format!("Tool {} not found", call.name));
        };

        self.logger.info(&format!(
            "[ChatRunner] Calling '{}' on '{}'",
            route.native_name, route.server
        ));

        match session.call_tool(&route.native_name, arguments.clone()).await {
            Ok(outcome) if !outcome.is_error => Ok(outcome.content_text()),
            Ok(outcome) => {
                self.logger.warn(&format!(
                    "[ChatRunner] Tool '{}' reported an error",
                    route.native_name
                ));
                Ok(failure_content(&call.name, &arguments, &outcome.content_text()))
            }
            Err(e) => {
                self.logger.warn(&format!(
                    "[ChatRunner] Tool '{}' could not be executed: {}",
                    route.native_name, e
                ));
                Ok(failure_content(&call.name, &arguments, &e.to_string()))
            }
        }
    }
}

fn failure_content(name: &str, arguments: &Value, response: &str) -> String {
    format!(
        "Something went wrong while executing tool {} with {}; Response: {}",
        name, arguments, response
    )
}
