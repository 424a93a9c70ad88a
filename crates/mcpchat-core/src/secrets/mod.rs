//! Secret storage for provider API keys
//!
//! - `EnvSecretStore`: process environment (read-only)
//! - `MemorySecretStore`: in-memory, for tests and embedding hosts

mod traits;
mod env_store;
mod memory_store;

pub use traits::{SecretStore, SecretStoreError, SecretStoreResult};
pub use env_store::EnvSecretStore;
pub use memory_store::MemorySecretStore;
