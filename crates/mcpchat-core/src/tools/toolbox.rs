//! Aggregated tool state across all configured tool servers

use std::sync::Arc;

use futures::future::join_all;

use crate::logging::Logger;
use crate::{log_info, log_warn};
use crate::mcp::{McpResult, ServerParams, SessionConnector, SessionScope, ToolSession};
use crate::types::{ToolDescriptor, ToolSchema};

use super::routing::{Route, RoutingTable};
use super::schema::to_tool_schemas;

/// Sessions, endpoint tool schemas and routing for one chat invocation
pub struct Toolbox {
    scope: SessionScope,
    schemas: Vec<ToolSchema>,
    routes: RoutingTable,
    logger: Arc<dyn Logger>,
}

impl Toolbox {
    /// Start every server, collect their tools and build the routing table
    ///
    /// Fails if any server fails to start or to list its tools; sessions
    /// already running are closed first.
    pub async fn assemble(
        connector: &dyn SessionConnector,
        servers: &[ServerParams],
        logger: Arc<dyn Logger>,
    ) -> McpResult<Self> {
        let scope = SessionScope::open(connector, servers, Arc::clone(&logger)).await?;

        let listings = join_all(scope.sessions().iter().map(|s| s.list_tools())).await;

        let mut per_session: Vec<Vec<ToolDescriptor>> = Vec::with_capacity(listings.len());
        for (index, listing) in listings.into_iter().enumerate() {
            match listing {
                Ok(tools) => per_session.push(tools),
                Err(e) => {
                    let name = scope.get(index).map(|s| s.name().to_string()).unwrap_or_default();
                    logger.error(&format!(
                        "[Toolbox] Listing tools from '{}' failed: {}",
                        name, e
                    ));
                    scope.close().await;
                    return Err(e);
                }
            }
        }

        let mut schemas = Vec::new();
        let mut routes = RoutingTable::new();

        for (index, tools) in per_session.iter().enumerate() {
            let server = scope.get(index).map(|s| s.name().to_string()).unwrap_or_default();
            schemas.extend(to_tool_schemas(tools, logger.as_ref()));

            for tool in tools {
                if let Some(displaced) = routes.insert(&tool.name, index, &server) {
                    log_warn!(
                        logger,
                        "[Toolbox] Tool '{}' from '{}' shadows '{}' from '{}'; calls go to '{}'",
                        tool.name, server, displaced.native_name, displaced.server, server
                    );
                }
            }
        }

        log_info!(
            logger,
            "[Toolbox] {} tool schema(s), {} routable name(s) from {} server(s)",
            schemas.len(),
            routes.len(),
            scope.len()
        );

        Ok(Self {
            scope,
            schemas,
            routes,
            logger,
        })
    }

    /// Tool schemas for the completion endpoint, in server order
    pub fn schemas(&self) -> &[ToolSchema] {
        &self.schemas
    }

    /// The routing table
    pub fn routes(&self) -> &RoutingTable {
        &self.routes
    }

    /// Resolve an endpoint-reported tool name to its route and session
    pub fn resolve(&self, endpoint_name: &str) -> Option<(&Route, &dyn ToolSession)> {
        let route = self.routes.resolve(endpoint_name)?;
        let session = self.scope.get(route.session)?;
        Some((route, session))
    }

    /// Close all sessions in reverse order of acquisition
    pub async fn close(self) {
        self.logger.debug("[Toolbox] Closing tool sessions");
        self.scope.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemoryLogger, NoOpLogger};
    use crate::mcp::{MockConnector, MockSession};
    use crate::types::ToolOutcome;
    use serde_json::json;

    fn calc_server() -> MockSession {
        MockSession::new("calc")
            .with_tool(
                ToolDescriptor::new("calc-add", "Add two numbers").with_schema(json!({
                    "properties": {"a": {"type": "number"}, "b": {"type": "number"}},
                    "required": ["a", "b"]
                })),
                ToolOutcome::success("4"),
            )
            .with_tool(
                ToolDescriptor::new("calc-sub", "Subtract"),
                ToolOutcome::success("0"),
            )
    }

    fn files_server() -> MockSession {
        MockSession::new("files").with_tool(
            ToolDescriptor::new("Read File", "Read a file"),
            ToolOutcome::success("contents"),
        )
    }

    #[tokio::test]
    async fn test_assemble_concatenates_in_server_order() {
        let connector = MockConnector::new()
            .with_session(calc_server())
            .with_session(files_server());
        let servers = [ServerParams::stdio("calc"), ServerParams::stdio("files")];

        let toolbox = Toolbox::assemble(&connector, &servers, Arc::new(NoOpLogger))
            .await
            .unwrap();

        let names: Vec<_> = toolbox.schemas().iter().map(ToolSchema::name).collect();
        assert_eq!(names, vec!["calc_add", "calc_sub", "read_file"]);
        assert_eq!(toolbox.schemas()[0].function.parameters["type"], "object");

        let (route, session) = toolbox.resolve("read_file").unwrap();
        assert_eq!(route.native_name, "Read File");
        assert_eq!(session.name(), "files");

        toolbox.close().await;
        assert_eq!(
            connector.events_with_prefix("close:"),
            vec!["close:files", "close:calc"]
        );
    }

    #[tokio::test]
    async fn test_undescribed_tools_are_routed_but_not_advertised() {
        let connector = MockConnector::new().with_session(
            MockSession::new("misc").with_tool(
                ToolDescriptor::new("hidden-tool", "x").without_description(),
                ToolOutcome::success("ok"),
            ),
        );

        let toolbox = Toolbox::assemble(&connector, &[ServerParams::stdio("misc")], Arc::new(NoOpLogger))
            .await
            .unwrap();

        assert!(toolbox.schemas().is_empty());
        assert!(toolbox.resolve("hidden_tool").is_some());
        toolbox.close().await;
    }

    #[tokio::test]
    async fn test_collision_later_server_wins_and_warns() {
        let connector = MockConnector::new()
            .with_session(calc_server())
            .with_session(MockSession::new("calc2").with_tool(
                ToolDescriptor::new("Calc Add", "Add, again"),
                ToolOutcome::success("five"),
            ));
        let logger = Arc::new(MemoryLogger::new());
        let servers = [ServerParams::stdio("calc"), ServerParams::stdio("calc2")];

        let toolbox = Toolbox::assemble(&connector, &servers, logger.clone()).await.unwrap();

        // Both schemas are advertised; routing keeps only the later one
        assert_eq!(toolbox.schemas().len(), 3);
        let (route, session) = toolbox.resolve("calc_add").unwrap();
        assert_eq!(route.native_name, "Calc Add");
        assert_eq!(session.name(), "calc2");
        assert!(logger.contains(LogLevel::Warn, "shadows 'calc-add'"));

        toolbox.close().await;
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal_and_closes_sessions() {
        let connector = MockConnector::new()
            .with_session(calc_server())
            .with_session(MockSession::new("flaky").failing_listing());
        let servers = [ServerParams::stdio("calc"), ServerParams::stdio("flaky")];

        let result = Toolbox::assemble(&connector, &servers, Arc::new(NoOpLogger)).await;
        assert!(result.is_err());
        assert_eq!(
            connector.events_with_prefix("close:"),
            vec!["close:flaky", "close:calc"]
        );
    }
}
