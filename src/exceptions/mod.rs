//! Failure classification subsystem.
//!
//! # Data Flow
//! ```text
//! handler / collaborator error
//!     → failure.rs (Failure: known exception or unchecked error)
//!     → responder.rs (single interception point on the router)
//!         → catalogue.rs (registry lookup)
//!         → sink.rs (record, when policy requires it)
//!     → client response
//! ```
//!
//! # Design Decisions
//! - Known exceptions are enum variants, not strings
//! - The registry is validated at startup and shared read-only via Arc
//! - Unchecked errors are always recorded and never shown to the client

pub mod catalogue;
pub mod failure;
pub mod responder;
pub mod sink;

pub use catalogue::{CatalogueEntry, Exception, ExceptionDescriptor, Registry, RegistryError};
pub use failure::{BoxError, Failure, FailureKind};
pub use responder::{intercept_failures, ErrorResponder, FALLBACK_MESSAGE};
pub use sink::{Classification, FailureRecord, FailureSink, MemorySink, RecordedFailure, TracingSink};
