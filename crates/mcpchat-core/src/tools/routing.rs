//! Routing from endpoint-facing tool names to owning sessions

use std::collections::HashMap;

use super::naming::{matches, translate};

/// Where a translated tool name is dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Name the owning server knows the tool by
    pub native_name: String,
    /// Index of the owning session, in acquisition order
    pub session: usize,
    /// Label of the owning server, for diagnostics
    pub server: String,
}

/// Translated tool name → owning session
///
/// Each translated name resolves to exactly one route. Registering a name that
/// is already present replaces the earlier route (last registered wins); the
/// replaced route is handed back so the caller can report the collision.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    routes: HashMap<String, Route>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a native tool name, returning the route it displaced
    pub fn insert(&mut self, native_name: &str, session: usize, server: &str) -> Option<Route> {
        self.routes.insert(
            translate(native_name),
            Route {
                native_name: native_name.to_string(),
                session,
                server: server.to_string(),
            },
        )
    }

    /// Find the route whose native name matches an endpoint-reported name
    pub fn resolve(&self, endpoint_name: &str) -> Option<&Route> {
        self.routes
            .values()
            .find(|route| matches(endpoint_name, &route.native_name))
    }

    /// Endpoint-facing names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
