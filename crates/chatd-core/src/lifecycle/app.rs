//! Process lifecycle: state machine, listener supervision and shutdown.

use std::fmt;
use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info};

use super::listener::Listener;
use super::shutdown::ShutdownRegistry;
use super::signals::shutdown_signal;

/// Where the process is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Initializing,
    Running,
    ShuttingDown,
    Terminated,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Initializing => write!(f, "initializing"),
            LifecycleState::Running => write!(f, "running"),
            LifecycleState::ShuttingDown => write!(f, "shutting_down"),
            LifecycleState::Terminated => write!(f, "terminated"),
        }
    }
}

/// Owns the shutdown registry and drives the process through its states.
///
/// During initialization callers acquire resources and register their
/// cleanup with [`App::on_shutdown`]. [`App::run`] then serves every listener
/// on its own task until all of them stop or a termination signal arrives,
/// and finally runs the cleanups in reverse order of registration.
///
/// In-flight requests are not drained: once the signal arrives the accept
/// loops are aborted and cleanup starts immediately.
pub struct App {
    name: String,
    shutdown: ShutdownRegistry,
    state: watch::Sender<LifecycleState>,
}

impl App {
    pub fn new(name: impl Into<String>) -> Self {
        let (state, _) = watch::channel(LifecycleState::Initializing);
        Self {
            name: name.into(),
            shutdown: ShutdownRegistry::new(),
            state,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Register a cleanup action; later registrations run first.
    pub fn on_shutdown<F, Fut>(&mut self, name: impl Into<String>, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.shutdown.register(name, action);
    }

    /// Serve until every listener stops or SIGINT/SIGTERM is received.
    pub async fn run(self, listeners: Vec<Box<dyn Listener>>) {
        self.run_until(listeners, shutdown_signal()).await;
    }

    /// Serve until every listener stops or `signal` resolves, then shut down.
    pub async fn run_until<S>(mut self, listeners: Vec<Box<dyn Listener>>, signal: S)
    where
        S: Future<Output = ()>,
    {
        self.transition(LifecycleState::Running);
        info!(app = %self.name, listeners = listeners.len(), "app running");

        let mut tasks = JoinSet::new();
        for listener in listeners {
            let name = listener.name().to_string();
            tasks.spawn(async move {
                let result = listener.listen().await;
                (name, result)
            });
        }

        {
            let all_stopped = async {
                while let Some(joined) = tasks.join_next().await {
                    match joined {
                        Ok((name, Ok(()))) => info!(listener = %name, "listener stopped"),
                        Ok((name, Err(e))) => error!(listener = %name, error = %e, "listener failed"),
                        Err(e) => error!(error = %e, "listener task aborted"),
                    }
                }
            };

            tokio::select! {
                _ = all_stopped => info!("all listeners stopped"),
                _ = signal => info!("termination signal received"),
            }
        }

        tasks.abort_all();
        self.shutdown().await;
    }

    /// Run every registered cleanup action and mark the app terminated.
    ///
    /// Also used to release resources when startup aborts before running.
    pub async fn shutdown(&mut self) {
        self.transition(LifecycleState::ShuttingDown);
        self.shutdown.run_all().await;
        self.transition(LifecycleState::Terminated);
        info!(app = %self.name, "app shutdown");
    }

    fn transition(&self, next: LifecycleState) {
        let previous = self.state.send_replace(next);
        tracing::debug!(from = %previous, to = %next, "lifecycle transition");
    }
}
