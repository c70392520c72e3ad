//! Ordered cleanup actions run at process shutdown.

use std::collections::VecDeque;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tracing::{debug, error};

type CleanupFn = Box<dyn FnOnce() -> BoxFuture<'static, anyhow::Result<()>> + Send>;

struct CleanupAction {
    name: String,
    run: CleanupFn,
}

/// Cleanup actions registered while resources are acquired.
///
/// Registration pushes to the front, so [`ShutdownRegistry::run_all`] executes
/// in reverse order of acquisition: the last resource acquired is the first
/// released.
#[derive(Default)]
pub struct ShutdownRegistry {
    actions: VecDeque<CleanupAction>,
}

impl ShutdownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cleanup action to run at shutdown.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.actions.push_front(CleanupAction {
            name: name.into(),
            run: Box::new(move || action().boxed()),
        });
    }

    /// Number of pending actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Names of pending actions in execution order.
    pub fn pending(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name.as_str()).collect()
    }

    /// Run and drain every action, one at a time.
    ///
    /// A failing or panicking action is logged and the rest still run.
    pub async fn run_all(&mut self) {
        while let Some(action) = self.actions.pop_front() {
            debug!(action = %action.name, "running shutdown action");
            match AssertUnwindSafe((action.run)()).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!(action = %action.name, error = %e, "shutdown action failed");
                }
                Err(_) => {
                    error!(action = %action.name, "shutdown action panicked");
                }
            }
        }
    }
}
