//! Request identification.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) unless the client sent one
//! - Echo the request ID on every response
//! - Capture the request fields failure records need
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Context is captured before the handler runs, since the request is
//!   consumed by then

use axum::{
    extract::Request,
    http::{HeaderName, Method},
};
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer,
};

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Layer assigning a request ID to incoming requests.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer copying the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Request fields attached to failure records.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Option<String>,
    pub method: Method,
    pub path: String,
}

impl RequestContext {
    pub fn from_request(request: &Request) -> Self {
        let request_id = request
            .headers()
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            request_id,
            method: request.method().clone(),
            path: request.uri().path().to_string(),
        }
    }
}
