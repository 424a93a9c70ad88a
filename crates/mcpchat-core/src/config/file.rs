//! File-based configuration provider (YAML)
//!
//! Supports user-level (~/.config/mcpchat/config.yaml) and workspace-level (.config/mcpchat/config.yaml) config.
//!
//! ```yaml
//! defaults:
//!   provider: openai
//!   model: gpt-4o-mini
//!   max_turns: 16
//! servers:
//!   - name: ipinfo
//!     command: mcp-server-ipinfo
//!   - command: mcp-fsapi
//!     env:
//!       DIRECTORY: storage
//!   - url: http://localhost:8080/mcp
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::logging::{Logger, NoOpLogger};
use crate::mcp::ServerParams;
use super::traits::{same_label, ConfigError, ConfigProvider, ConfigResult, DefaultSettings};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Default settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultSettings>,

    /// Tool servers, kept loosely typed so a malformed list does not fail the whole file
    #[serde(default)]
    pub servers: Value,
}

/// Config level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    /// User-level config (~/.config/mcpchat/config.yaml)
    User,
    /// Workspace-level config (.config/mcpchat/config.yaml in workspace root)
    Workspace,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Workspace => "workspace",
        }
    }
}

/// File-based configuration provider
///
/// # Example
///
/// ```no_run
/// use mcpchat_core::config::FileConfigProvider;
///
/// // Workspace config if present, user config otherwise
/// let config = FileConfigProvider::discover(".");
/// println!("reading {}", config.path().display());
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    level: ConfigLevel,
    cache: RwLock<Option<ConfigFile>>,
    logger: Arc<dyn Logger>,
}

impl FileConfigProvider {
    /// Create a new file config provider for a specific path
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
            cache: RwLock::new(None),
            logger: Arc::new(NoOpLogger),
        }
    }

    /// Create a user-level config provider (~/.config/mcpchat/config.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        let path = config_dir.join("mcpchat").join("config.yaml");
        Self::new(path, ConfigLevel::User)
    }

    /// Create a workspace-level config provider (.config/mcpchat/config.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root.as_ref().join(".config").join("mcpchat").join("config.yaml");
        Self::new(path, ConfigLevel::Workspace)
    }

    /// Workspace-level config if its file exists, user-level otherwise
    pub fn discover(workspace_root: impl AsRef<Path>) -> Self {
        let workspace = Self::workspace(workspace_root);
        if workspace.exists() {
            workspace
        } else {
            Self::user()
        }
    }

    /// Report server list problems to `logger`
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> ConfigResult<ConfigFile> {
        if !self.path.exists() {
            return Ok(ConfigFile::default());
        }

        let content = fs::read_to_string(&self.path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Other(format!("Failed to parse YAML: {}", e)))
    }

    fn save(&self, config: &ConfigFile) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(config)
            .map_err(|e| ConfigError::Other(format!("Failed to serialize YAML: {}", e)))?;
        fs::write(&self.path, content)?;

        *self.cache.write() = Some(config.clone());
        Ok(())
    }

    fn get_config(&self) -> ConfigResult<ConfigFile> {
        if let Some(config) = self.cache.read().as_ref() {
            return Ok(config.clone());
        }
        self.reload()
    }

    /// Reload config from disk (invalidate cache)
    pub fn reload(&self) -> ConfigResult<ConfigFile> {
        let config = self.load()?;
        *self.cache.write() = Some(config.clone());
        Ok(config)
    }

    /// Set default settings
    pub fn set_defaults(&self, defaults: DefaultSettings) -> ConfigResult<()> {
        let mut config = self.get_config()?;
        config.defaults = Some(defaults);
        self.save(&config)
    }

    /// Apply `edit` to the raw server list and save
    ///
    /// A missing list is created; a value that is not a list cannot be edited.
    fn edit_servers<F>(&self, edit: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Vec<Value>) -> ConfigResult<()>,
    {
        let mut config = self.get_config()?;
        if config.servers.is_null() {
            config.servers = Value::Array(Vec::new());
        }
        let entries = config
            .servers
            .as_array_mut()
            .ok_or(ConfigError::InvalidServers)?;
        edit(entries)?;
        self.save(&config)
    }
}

fn entry_has_label(entry: &Value, name: &str) -> bool {
    serde_json::from_value::<ServerParams>(entry.clone())
        .map(|server| same_label(&server, name))
        .unwrap_or(false)
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}

#[async_trait]
impl ConfigProvider for FileConfigProvider {
    async fn get_servers(&self) -> ConfigResult<Vec<ServerParams>> {
        let config = self.get_config()?;
        Ok(ServerParams::parse_list(&config.servers, self.logger.as_ref()))
    }

    async fn add_server(&self, server: ServerParams) -> ConfigResult<()> {
        let entry = serde_json::to_value(&server)?;
        self.edit_servers(|entries| {
            if entries.iter().any(|e| entry_has_label(e, server.label())) {
                return Err(ConfigError::ServerExists(server.label().to_string()));
            }
            entries.push(entry);
            Ok(())
        })
    }

    async fn update_server(&self, name: &str, server: ServerParams) -> ConfigResult<()> {
        let entry = serde_json::to_value(&server)?;
        self.edit_servers(|entries| match entries.iter_mut().find(|e| entry_has_label(e, name)) {
            Some(slot) => {
                *slot = entry;
                Ok(())
            }
            None => Err(ConfigError::ServerNotFound(name.to_string())),
        })
    }

    async fn remove_server(&self, name: &str) -> ConfigResult<()> {
        self.edit_servers(|entries| {
            let original_len = entries.len();
            entries.retain(|e| !entry_has_label(e, name));
            if entries.len() == original_len {
                Err(ConfigError::ServerNotFound(name.to_string()))
            } else {
                Ok(())
            }
        })
    }

    async fn get_defaults(&self) -> ConfigResult<DefaultSettings> {
        Ok(self.get_config()?.defaults.unwrap_or_default())
    }
}
