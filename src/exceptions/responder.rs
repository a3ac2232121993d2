//! Centralized failure-to-response translation.
//!
//! # Flow
//! ```text
//! handler returns Err(Failure)
//!     → Failure::into_response parks it in response extensions
//!     → intercept_failures (installed once on the router) removes it
//!     → ErrorResponder::respond: classify → maybe record → response
//! ```
//!
//! The produced response carries no failure, so it passes back out through
//! the middleware untouched.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::exceptions::catalogue::{ExceptionDescriptor, Registry};
use crate::exceptions::failure::{Failure, FailureKind, RaisedFailure};
use crate::exceptions::sink::{Classification, FailureRecord, FailureSink};
use crate::http::request::RequestContext;
use crate::observability::metrics;

/// Body sent for every unchecked error.
pub const FALLBACK_MESSAGE: &str = "Internal server error.";

/// Shared failure handler.
#[derive(Clone)]
pub struct ErrorResponder {
    registry: Arc<Registry>,
    sink: Arc<dyn FailureSink>,
}

impl ErrorResponder {
    pub fn new(registry: Arc<Registry>, sink: Arc<dyn FailureSink>) -> Self {
        Self { registry, sink }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolve a failure to its descriptor, `None` meaning unchecked.
    pub fn classify(&self, failure: &Failure) -> Option<&ExceptionDescriptor> {
        match failure.kind() {
            FailureKind::Known(exception) => self.registry.resolve(*exception),
            FailureKind::Unchecked(_) => None,
        }
    }

    /// Turn a failure into the client response, recording it when required.
    pub fn respond(&self, failure: &Failure, request: &RequestContext) -> Response {
        let descriptor = self.classify(failure);
        let classification = match descriptor {
            Some(_) => Classification::Exception,
            None => Classification::Error,
        };

        metrics::record_failure(classification, failure.identifier());

        if descriptor.map_or(true, |d| d.should_log) {
            self.sink.record(&FailureRecord {
                classification,
                failure,
                request,
            });
        }

        match descriptor {
            Some(descriptor) => (descriptor.status, descriptor.message).into_response(),
            None => (StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_MESSAGE).into_response(),
        }
    }
}

/// Router middleware translating parked failures into responses.
pub async fn intercept_failures(
    State(responder): State<ErrorResponder>,
    request: Request,
    next: Next,
) -> Response {
    let context = RequestContext::from_request(&request);
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<RaisedFailure>() {
        Some(RaisedFailure(failure)) => responder.respond(&failure, &context),
        None => response,
    }
}
