//! Process lifecycle management.
//!
//! # Data Flow
//! ```text
//! Initializing:
//!     init logging → load config → connect (retry with backoff) → migrate
//!     → wire services → bind listeners
//!     (each acquisition registers a cleanup action)
//!
//! Running:
//!     one task per listener; wait for all to stop or for SIGINT/SIGTERM
//!
//! ShuttingDown → Terminated:
//!     cleanup actions in reverse order of registration, failures logged
//! ```

pub mod app;
pub mod backoff;
pub mod listener;
pub mod shutdown;
pub mod signals;

pub use app::{App, LifecycleState};
pub use backoff::{BackoffPolicy, retry_with_backoff};
pub use listener::Listener;
pub use shutdown::ShutdownRegistry;
