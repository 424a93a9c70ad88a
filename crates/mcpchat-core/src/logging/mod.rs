//! Logging abstractions for runtime-agnostic logging
//!
//! Every component receives an `Arc<dyn Logger>` so the host decides where
//! diagnostics go (console, an editor output channel, nowhere in tests).

mod traits;
mod noop;
mod console;
mod memory;

pub use traits::Logger;
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use memory::{MemoryLogger, LogLevel};
