//! Tool server sessions (Model Context Protocol)
//!
//! Uses the official rmcp SDK to talk to tool servers over stdio (child
//! process) or streamable HTTP.
//!
//! # Example
//!
//! ```rust,ignore
//! use mcpchat_core::mcp::{McpConnector, ServerParams, SessionScope};
//! use std::sync::Arc;
//!
//! let logger: Arc<dyn Logger> = Arc::new(NoOpLogger::new());
//! let connector = McpConnector::new(logger.clone());
//!
//! let servers = vec![
//!     ServerParams::stdio("mcp-server-ipinfo"),
//!     ServerParams::stdio("mcp-fsapi").with_env("DIRECTORY", "storage"),
//! ];
//!
//! // All servers start together, or none do
//! let scope = SessionScope::open(&connector, &servers, logger).await?;
//! for session in scope.sessions() {
//!     println!("{}: {} tools", session.name(), session.list_tools().await?.len());
//! }
//! scope.close().await;
//! ```

mod error;
mod params;
mod session;
mod client;
mod scope;
mod mock;

pub use error::{McpError, McpResult};
pub use params::{ServerParams, ServerTransport};
pub use session::{ToolSession, SessionConnector};
pub use client::{McpSession, McpConnector};
pub use scope::SessionScope;
pub use mock::{MockSession, MockConnector, RecordedCall, EventJournal};
