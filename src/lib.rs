//! Thing service with centralized failure handling.
//!
//! Request handlers raise either a known exception, catalogued with its
//! client message, status and log policy, or an unchecked error. A single
//! responder installed on the router turns every failure into the final
//! response and records the ones worth recording.

pub mod config;
pub mod exceptions;
pub mod http;
pub mod lifecycle;
pub mod notify;
pub mod observability;
pub mod store;

pub use config::ServerConfig;
pub use exceptions::{ErrorResponder, Exception, Failure, Registry};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
