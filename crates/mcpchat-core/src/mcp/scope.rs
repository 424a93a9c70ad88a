//! Scoped ownership of all tool sessions for one chat invocation

use std::sync::Arc;

use futures::future::join_all;

use crate::logging::Logger;

use super::error::McpResult;
use super::params::ServerParams;
use super::session::{SessionConnector, ToolSession};

/// All sessions opened for one invocation, in acquisition order
///
/// Startup is all-or-nothing and [`SessionScope::close`] tears sessions down
/// in reverse order. A scope dropped without `close` (cancelled future,
/// panic) still releases its sessions newest first, without the async
/// shutdown handshake.
pub struct SessionScope {
    sessions: Vec<Box<dyn ToolSession>>,
    logger: Arc<dyn Logger>,
}

impl SessionScope {
    /// Open and initialize one session per server
    ///
    /// Handshakes run concurrently. If any session fails to open or
    /// initialize, every session acquired so far is closed and the first
    /// error is returned.
    pub async fn open(
        connector: &dyn SessionConnector,
        servers: &[ServerParams],
        logger: Arc<dyn Logger>,
    ) -> McpResult<Self> {
        let mut scope = Self {
            sessions: Vec::with_capacity(servers.len()),
            logger,
        };

        for params in servers {
            match connector.open(params) {
                Ok(session) => scope.sessions.push(session),
                Err(e) => {
                    scope.logger.error(&format!(
                        "[SessionScope] Could not open '{}': {}",
                        params.label(),
                        e
                    ));
                    scope.close().await;
                    return Err(e);
                }
            }
        }

        let results = join_all(scope.sessions.iter_mut().map(|s| s.initialize())).await;

        let failure = results
            .into_iter()
            .zip(servers)
            .find_map(|(result, params)| result.err().map(|e| (params.label().to_string(), e)));

        if let Some((label, e)) = failure {
            scope.logger.error(&format!(
                "[SessionScope] Tool server '{}' failed to start: {}",
                label, e
            ));
            scope.close().await;
            return Err(e);
        }

        scope.logger.info(&format!(
            "[SessionScope] {} tool server(s) ready",
            scope.sessions.len()
        ));
        Ok(scope)
    }

    /// Sessions in acquisition order
    pub fn sessions(&self) -> &[Box<dyn ToolSession>] {
        &self.sessions
    }

    /// Session at `index`
    pub fn get(&self, index: usize) -> Option<&dyn ToolSession> {
        self.sessions.get(index).map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Close every session, last acquired first
    ///
    /// Failures are logged and do not stop the remaining sessions from closing.
    pub async fn close(mut self) {
        while let Some(mut session) = self.sessions.pop() {
            if let Err(e) = session.close().await {
                self.logger.warn(&format!(
                    "[SessionScope] Error while closing '{}': {}",
                    session.name(),
                    e
                ));
            }
        }
    }
}

impl Drop for SessionScope {
    fn drop(&mut self) {
        if self.sessions.is_empty() {
            return;
        }
        self.logger.warn(&format!(
            "[SessionScope] Dropping {} open session(s) without closing them",
            self.sessions.len()
        ));
        while let Some(session) = self.sessions.pop() {
            drop(session);
        }
    }
}
