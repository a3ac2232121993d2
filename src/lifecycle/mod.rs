//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Registry → Data store → Notifier → Listener
//!
//! Shutdown (shutdown.rs):
//!     SIGTERM/SIGINT → trigger → stop accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - A failure before the listener is bound terminates the process
//! - Shutdown drains in-flight requests before returning

pub mod shutdown;
pub mod startup;

pub use shutdown::{wait_for_signal, Shutdown};
pub use startup::{bootstrap, Started, StartupError};
