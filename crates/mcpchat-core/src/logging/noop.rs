//! Silent logger

use super::traits::Logger;

/// Discards everything; the default for tests and for library users that
/// do not care about diagnostics
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl NoOpLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for NoOpLogger {
    fn debug(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_noop_logger_as_shared_sink() {
        let logger: Arc<dyn Logger> = Arc::new(NoOpLogger::new());
        crate::log_info!(logger, "[Test] {} server(s) ready", 2);
        crate::log_error!(logger, "[Test] nothing to see");
    }
}
