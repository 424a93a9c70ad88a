//! Tool-augmented chat completion
//!
//! [`ChatRunner::run`] sends the conversation to the completion provider
//! together with every tool the configured servers expose, executes the tool
//! calls the model asks for and feeds the results back until the model
//! answers without requesting tools.
//!
//! ```rust,ignore
//! use mcpchat_core::chat::ChatRunner;
//! use mcpchat_core::mcp::ServerParams;
//!
//! let runner = ChatRunner::new(provider, logger);
//! let mut conversation = vec![ChatMessage::user("What is my public IP?")];
//! let reply = runner
//!     .run(&mut conversation, "openai/gpt-4o-mini", &[ServerParams::stdio("mcp-server-ipinfo")])
//!     .await?;
//! println!("{}", reply.content.to_text());
//! ```

mod error;
mod runner;

pub use error::{ChatError, ChatResult};
pub use runner::ChatRunner;

/// Completion requests allowed per invocation unless configured otherwise
pub const DEFAULT_MAX_TURNS: u32 = 32;

/// Per-invocation settings
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    /// Maximum completion requests per invocation; `None` for no limit
    pub max_turns: Option<u32>,
    /// Temperature passed to every completion request
    pub temperature: Option<f32>,
    /// Max tokens passed to every completion request
    pub max_tokens: Option<u32>,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            max_turns: Some(DEFAULT_MAX_TURNS),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = Some(turns);
        self
    }

    /// Let the model request tools indefinitely
    pub fn without_turn_limit(mut self) -> Self {
        self.max_turns = None;
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}
