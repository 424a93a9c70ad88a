//! Tool discovery, schema conversion and routing
//!
//! ```text
//! ┌──────────────┐  list_tools   ┌──────────────┐  schemas   ┌──────────────┐
//! │ tool servers │ ────────────▶ │   Toolbox    │ ─────────▶ │  completion  │
//! │ (sessions)   │ ◀──────────── │  + routing   │ ◀───────── │  endpoint    │
//! └──────────────┘   call_tool   └──────────────┘ tool calls └──────────────┘
//! ```
//!
//! - `naming`: native tool name ↔ endpoint-safe function name
//! - `schema`: tool descriptors → endpoint tool schemas
//! - `routing`: endpoint name → owning session
//! - `toolbox`: all of the above for one set of running servers

pub mod naming;
mod schema;
mod routing;
mod toolbox;

pub use naming::{translate, matches};
pub use schema::{with_schema_defaults, to_tool_schema, to_tool_schemas};
pub use routing::{Route, RoutingTable};
pub use toolbox::Toolbox;
