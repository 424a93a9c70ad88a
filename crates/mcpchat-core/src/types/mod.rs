//! Core types for tool-augmented chat
//!
//! This module contains the shared types used by providers, tool servers and the chat loop.

mod message;
mod tool;

pub use message::{ChatMessage, ContentPart, MessageRole, MessageContent};
pub use tool::{ToolDescriptor, ToolSchema, FunctionDefinition, ToolCall, ToolOutcome};
