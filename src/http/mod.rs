//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, failure context)
//!     → handlers.rs (GET /, POST /things)
//!     → exceptions::responder (failures only)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use request::{RequestContext, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
