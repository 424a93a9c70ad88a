//! In-memory configuration provider

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::mcp::ServerParams;
use super::traits::{same_label, ConfigError, ConfigProvider, ConfigResult, DefaultSettings};

/// In-memory configuration provider for testing
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    servers: RwLock<Vec<ServerParams>>,
    defaults: RwLock<DefaultSettings>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with initial servers
    pub fn with_servers(servers: Vec<ServerParams>) -> Self {
        Self {
            servers: RwLock::new(servers),
            ..Default::default()
        }
    }

    /// Replace the defaults
    pub fn set_defaults(&self, defaults: DefaultSettings) {
        *self.defaults.write() = defaults;
    }

    pub fn clear(&self) {
        self.servers.write().clear();
    }
}

#[async_trait]
impl ConfigProvider for MemoryConfigProvider {
    async fn get_servers(&self) -> ConfigResult<Vec<ServerParams>> {
        Ok(self.servers.read().clone())
    }

    async fn add_server(&self, server: ServerParams) -> ConfigResult<()> {
        let mut guard = self.servers.write();
        if guard.iter().any(|s| same_label(s, server.label())) {
            return Err(ConfigError::ServerExists(server.label().to_string()));
        }
        guard.push(server);
        Ok(())
    }

    async fn update_server(&self, name: &str, server: ServerParams) -> ConfigResult<()> {
        let mut guard = self.servers.write();
        match guard.iter_mut().find(|s| same_label(s, name)) {
            Some(slot) => {
                *slot = server;
                Ok(())
            }
            None => Err(ConfigError::ServerNotFound(name.to_string())),
        }
    }

    async fn remove_server(&self, name: &str) -> ConfigResult<()> {
        let mut guard = self.servers.write();
        let original_len = guard.len();
        guard.retain(|s| !same_label(s, name));

        if guard.len() == original_len {
            Err(ConfigError::ServerNotFound(name.to_string()))
        } else {
            Ok(())
        }
    }

    async fn get_defaults(&self) -> ConfigResult<DefaultSettings> {
        Ok(self.defaults.read().clone())
    }
}
