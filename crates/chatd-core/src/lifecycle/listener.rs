//! Long-running network listeners driven by the orchestrator.

use futures_util::future::BoxFuture;

/// A unit of serving work, e.g. an HTTP server bound to a socket.
///
/// Binding happens when the listener is constructed so that bind failures
/// surface during startup; `listen` only runs the accept loop.
pub trait Listener: Send + 'static {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Serve until the listener stops or fails.
    fn listen(self: Box<Self>) -> BoxFuture<'static, anyhow::Result<()>>;
}
