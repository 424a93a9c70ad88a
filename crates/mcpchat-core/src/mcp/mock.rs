//! Scripted tool sessions for testing
//!
//! Deterministic stand-ins for MCP servers: fixed tool listings, canned
//! outcomes per tool, and a shared event journal so tests can check the
//! order of initialization, calls and teardown across sessions. A session
//! dropped while still initialized records `drop:<name>`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::types::{ToolDescriptor, ToolOutcome};

use super::error::{McpError, McpResult};
use super::params::ServerParams;
use super::session::{SessionConnector, ToolSession};

/// Shared, ordered record of session events (`"init:alpha"`, `"call:alpha:calc-add"`, ...)
pub type EventJournal = Arc<Mutex<Vec<String>>>;

/// A tool call received by a [`MockSession`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub session: String,
    pub tool: String,
    pub arguments: Value,
}

/// Scripted tool session
#[derive(Debug, Clone)]
pub struct MockSession {
    name: String,
    tools: Vec<ToolDescriptor>,
    outcomes: HashMap<String, ToolOutcome>,
    broken_tools: Vec<String>,
    fail_initialize: bool,
    fail_listing: bool,
    initialized: bool,
    journal: EventJournal,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockSession {
    /// Create a session with no tools
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tools: Vec::new(),
            outcomes: HashMap::new(),
            broken_tools: Vec::new(),
            fail_initialize: false,
            fail_listing: false,
            initialized: false,
            journal: EventJournal::default(),
            calls: Arc::default(),
        }
    }

    /// Expose a tool that answers with `outcome`
    pub fn with_tool(mut self, tool: ToolDescriptor, outcome: ToolOutcome) -> Self {
        self.outcomes.insert(tool.name.clone(), outcome);
        self.tools.push(tool);
        self
    }

    /// Expose a tool whose calls fail at the transport level
    pub fn with_broken_tool(mut self, tool: ToolDescriptor) -> Self {
        self.broken_tools.push(tool.name.clone());
        self.tools.push(tool);
        self
    }

    /// Make the handshake fail
    pub fn failing_initialize(mut self) -> Self {
        self.fail_initialize = true;
        self
    }

    /// Make the tool listing fail
    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// Calls received so far, shared between clones
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    fn record(&self, event: String) {
        self.journal.lock().push(event);
    }
}

#[async_trait]
impl ToolSession for MockSession {
    fn name(&self) -> &str {
        &self.name
    }

    async fn initialize(&mut self) -> McpResult<()> {
        if self.initialized {
            return Ok(());
        }
        self.record(format!("init:{}", self.name));
        if self.fail_initialize {
            return Err(McpError::InitializationFailed(format!(
                "{}: mock handshake refused",
                self.name
            )));
        }
        self.initialized = true;
        Ok(())
    }

    async fn list_tools(&self) -> McpResult<Vec<ToolDescriptor>> {
        if !self.initialized {
            return Err(McpError::NotInitialized(self.name.clone()));
        }
        self.record(format!("list:{}", self.name));
        if self.fail_listing {
            return Err(McpError::Protocol(format!("{}: mock listing failed", self.name)));
        }
        Ok(self.tools.clone())
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> McpResult<ToolOutcome> {
        if !self.initialized {
            return Err(McpError::NotInitialized(self.name.clone()));
        }
        self.record(format!("call:{}:{}", self.name, name));
        self.calls.lock().push(RecordedCall {
            session: self.name.clone(),
            tool: name.to_string(),
            arguments,
        });

        if self.broken_tools.iter().any(|t| t == name) {
            return Err(McpError::ToolCallFailed(format!("{}: connection reset", name)));
        }

        Ok(self
            .outcomes
            .get(name)
            .cloned()
            .unwrap_or_else(|| ToolOutcome::error(format!("unknown tool: {}", name))))
    }

    async fn close(&mut self) -> McpResult<()> {
        self.record(format!("close:{}", self.name));
        self.initialized = false;
        Ok(())
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        if self.initialized {
            self.record(format!("drop:{}", self.name));
        }
    }
}

/// Connector that hands out [`MockSession`]s by server label
#[derive(Debug, Default)]
pub struct MockConnector {
    sessions: HashMap<String, MockSession>,
    journal: EventJournal,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session template, keyed by its name
    ///
    /// The session joins this connector's event journal.
    pub fn with_session(mut self, mut session: MockSession) -> Self {
        session.journal = Arc::clone(&self.journal);
        self.sessions.insert(session.name.clone(), session);
        self
    }

    /// Registered session template, sharing call records with opened sessions
    pub fn session(&self, name: &str) -> Option<&MockSession> {
        self.sessions.get(name)
    }

    /// All recorded events, in order
    pub fn events(&self) -> Vec<String> {
        self.journal.lock().clone()
    }

    /// Recorded events starting with `prefix`, in order
    pub fn events_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.journal
            .lock()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .cloned()
            .collect()
    }
}

impl SessionConnector for MockConnector {
    fn open(&self, params: &ServerParams) -> McpResult<Box<dyn ToolSession>> {
        let session = self
            .sessions
            .get(params.label())
            .cloned()
            .ok_or_else(|| McpError::ConnectionFailed(format!("no mock server '{}'", params.label())))?;
        Ok(Box::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_session_lifecycle() {
        let mut session = MockSession::new("calc").with_tool(
            ToolDescriptor::new("calc-add", "Add two numbers"),
            ToolOutcome::success("4"),
        );

        assert!(session.list_tools().await.is_err());
        session.initialize().await.unwrap();
        assert_eq!(session.list_tools().await.unwrap().len(), 1);

        let outcome = session.call_tool("calc-add", json!({"a": 2, "b": 2})).await.unwrap();
        assert_eq!(outcome, ToolOutcome::success("4"));
        assert_eq!(session.calls()[0].arguments, json!({"a": 2, "b": 2}));

        let unknown = session.call_tool("calc-sub", json!({})).await.unwrap();
        assert!(unknown.is_error);

        session.close().await.unwrap();
        assert!(session.call_tool("calc-add", json!({})).await.is_err());
    }

    #[test]
    fn test_connector_rejects_unknown_server() {
        let connector = MockConnector::new().with_session(MockSession::new("known"));
        assert!(connector.open(&ServerParams::stdio("known")).is_ok());
        assert!(connector.open(&ServerParams::stdio("unknown")).is_err());
    }
}
