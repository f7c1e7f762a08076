//! Route navigation seam.

/// Moves the host application to another route.
pub trait Navigator: Send + Sync {
    fn goto(&self, route: &str);
}

/// Navigator for hosts without routing; only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn goto(&self, route: &str) {
        tracing::debug!(route, "Navigation requested");
    }
}
