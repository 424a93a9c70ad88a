//! Mock provider for testing
//!
//! Deterministic replies without network dependencies. Every request is
//! recorded so tests can inspect what the chat loop sent.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{ProviderError, ProviderResult};
use super::traits::{CompletionRequest, Provider};
use crate::logging::Logger;
use crate::types::{ChatMessage, MessageRole};

/// Mock response mode
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Echo back the last user message
    Echo,
    /// Return a fixed response
    Fixed(String),
    /// Return these replies in order, then fail
    Script(Vec<ChatMessage>),
    /// Fail every request
    Error(String),
}

impl Default for MockMode {
    fn default() -> Self {
        MockMode::Echo
    }
}

/// Mock completion provider
pub struct MockProvider {
    mode: MockMode,
    script: Mutex<VecDeque<ChatMessage>>,
    requests: Mutex<Vec<CompletionRequest>>,
    logger: Arc<dyn Logger>,
}

impl MockProvider {
    /// Create a mock provider in the given mode
    pub fn with_mode(mode: MockMode, logger: Arc<dyn Logger>) -> Self {
        let script = match &mode {
            MockMode::Script(replies) => replies.iter().cloned().collect(),
            _ => VecDeque::new(),
        };
        Self {
            mode,
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
            logger,
        }
    }

    /// Create an echo provider (echoes back user message)
    pub fn echo(logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Echo, logger)
    }

    /// Create a fixed response provider
    pub fn fixed(response: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Fixed(response.into()), logger)
    }

    /// Create a provider that plays back `replies` one request at a time
    pub fn scripted(replies: Vec<ChatMessage>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Script(replies), logger)
    }

    /// Create an error-producing provider
    pub fn error(message: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Error(message.into()), logger)
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().last().cloned()
    }

    fn last_user_message(messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .rev()
            .filter(|m| m.role == MessageRole::User)
            .map(|m| m.content.to_text())
            .find(|text| !text.is_empty())
            .unwrap_or_else(|| "Hello from MockProvider!".to_string())
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> ProviderResult<ChatMessage> {
        self.logger.debug(&format!(
            "[MockProvider] complete: {} message(s), tools={}",
            request.messages.len(),
            request.tools.as_ref().map_or(0, Vec::len)
        ));

        let reply = match &self.mode {
            MockMode::Echo => Ok(ChatMessage::assistant(Self::last_user_message(&request.messages))),
            MockMode::Fixed(text) => Ok(ChatMessage::assistant(text.clone())),
            MockMode::Script(_) => self
                .script
                .lock()
                .pop_front()
                .ok_or_else(|| ProviderError::Other("Mock script exhausted".to_string())),
            MockMode::Error(message) => Err(ProviderError::api_error("mock", 500, message.clone())),
        };

        self.requests.lock().push(request);
        reply
    }
}
