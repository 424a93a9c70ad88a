//! Tool server connection parameters

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::logging::Logger;

/// How to reach one tool server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerParams {
    /// Optional display name, used in logs and config edits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Transport details
    #[serde(flatten)]
    pub transport: ServerTransport,
}

/// Transport used to talk to a tool server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerTransport {
    /// Spawn a child process and speak MCP over its stdin/stdout
    Stdio {
        command: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<String>,
        /// Extra environment variables, added on top of the inherited environment
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        env: HashMap<String, String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cwd: Option<PathBuf>,
    },
    /// Connect to a server over streamable HTTP
    Http {
        url: String,
    },
}

impl ServerParams {
    /// Parameters for a stdio server started with `command`
    pub fn stdio(command: impl Into<String>) -> Self {
        Self {
            name: None,
            transport: ServerTransport::Stdio {
                command: command.into(),
                args: Vec::new(),
                env: HashMap::new(),
                cwd: None,
            },
        }
    }

    /// Parameters for a streamable HTTP server
    pub fn http(url: impl Into<String>) -> Self {
        Self {
            name: None,
            transport: ServerTransport::Http { url: url.into() },
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append command-line arguments (stdio only)
    pub fn with_args(mut self, extra: impl IntoIterator<Item = impl Into<String>>) -> Self {
        if let ServerTransport::Stdio { args, .. } = &mut self.transport {
            args.extend(extra.into_iter().map(Into::into));
        }
        self
    }

    /// Add an environment variable (stdio only)
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let ServerTransport::Stdio { env, .. } = &mut self.transport {
            env.insert(key.into(), value.into());
        }
        self
    }

    /// Set the working directory (stdio only)
    pub fn with_cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        if let ServerTransport::Stdio { cwd, .. } = &mut self.transport {
            *cwd = Some(dir.into());
        }
        self
    }

    /// Name used in logs: the explicit name, else the command or URL
    pub fn label(&self) -> &str {
        if let Some(name) = &self.name {
            return name;
        }
        match &self.transport {
            ServerTransport::Stdio { command, .. } => command,
            ServerTransport::Http { url } => url,
        }
    }

    /// Leniently read a server list from a loosely-typed config value
    ///
    /// `null` yields an empty list. Any other non-list value yields an empty
    /// list and a warning. Entries that fail to parse are skipped with a
    /// warning; the rest are kept in order.
    pub fn parse_list(value: &Value, logger: &dyn Logger) -> Vec<ServerParams> {
        let entries = match value {
            Value::Null => return Vec::new(),
            Value::Array(entries) => entries,
            other => {
                logger.warn(&format!(
                    "[ServerParams] Tool server list is not a list ({}), running without tools",
                    value_kind(other)
                ));
                return Vec::new();
            }
        };

        entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| match serde_json::from_value::<ServerParams>(entry.clone()) {
                Ok(params) => Some(params),
                Err(e) => {
                    logger.warn(&format!(
                        "[ServerParams] Skipping tool server entry {}: {}",
                        i, e
                    ));
                    None
                }
            })
            .collect()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemoryLogger, NoOpLogger};
    use serde_json::json;

    #[test]
    fn test_builder_and_label() {
        let fs = ServerParams::stdio("mcp-fsapi")
            .with_env("DIRECTORY", "storage")
            .with_args(["--verbose"]);
        assert_eq!(fs.label(), "mcp-fsapi");

        let named = fs.clone().with_name("files");
        assert_eq!(named.label(), "files");

        match &fs.transport {
            ServerTransport::Stdio { args, env, .. } => {
                assert_eq!(args, &vec!["--verbose".to_string()]);
                assert_eq!(env.get("DIRECTORY").map(String::as_str), Some("storage"));
            }
            ServerTransport::Http { .. } => panic!("expected stdio transport"),
        }

        assert_eq!(ServerParams::http("http://localhost:8000/mcp").label(), "http://localhost:8000/mcp");
    }

    #[test]
    fn test_deserialize_transports() {
        let stdio: ServerParams = serde_json::from_value(json!({
            "name": "ipinfo",
            "command": "mcp-server-ipinfo"
        }))
        .unwrap();
        assert_eq!(stdio, ServerParams::stdio("mcp-server-ipinfo").with_name("ipinfo"));

        let http: ServerParams = serde_json::from_value(json!({"url": "http://localhost:9000/mcp"})).unwrap();
        assert_eq!(http, ServerParams::http("http://localhost:9000/mcp"));
    }

    #[test]
    fn test_parse_list_null_and_empty() {
        assert!(ServerParams::parse_list(&Value::Null, &NoOpLogger).is_empty());
        assert!(ServerParams::parse_list(&json!([]), &NoOpLogger).is_empty());
    }

    #[test]
    fn test_parse_list_not_a_list() {
        let logger = MemoryLogger::new();
        let servers = ServerParams::parse_list(&json!({"command": "mcp-fsapi"}), &logger);
        assert!(servers.is_empty());
        assert!(logger.contains(LogLevel::Warn, "not a list (object)"));
    }

    #[test]
    fn test_parse_list_skips_bad_entries() {
        let logger = MemoryLogger::new();
        let servers = ServerParams::parse_list(
            &json!([
                {"command": "first"},
                42,
                {"args": ["missing command"]},
                {"command": "second", "env": {"DIRECTORY": "storage"}}
            ]),
            &logger,
        );

        let labels: Vec<_> = servers.iter().map(ServerParams::label).collect();
        assert_eq!(labels, vec!["first", "second"]);
        assert_eq!(logger.messages(LogLevel::Warn).len(), 2);
    }
}
