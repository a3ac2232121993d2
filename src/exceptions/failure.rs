//! Failures raised by request handlers.
//!
//! Handlers return `Result<_, Failure>` and propagate with `?`. A `Failure`
//! never builds the client response itself: converting it into a response
//! only parks it in the response extensions, where the responder middleware
//! picks it up.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::exceptions::catalogue::Exception;
use crate::store::StoreError;

/// Boxed underlying cause of a failure.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// A catalogued exception.
    Known(Exception),
    /// Anything else. The message is for operators only.
    Unchecked(Cow<'static, str>),
}

/// A failure raised while handling a request.
#[derive(Debug)]
pub struct Failure {
    kind: FailureKind,
    cause: Option<BoxError>,
}

impl Failure {
    /// Failure for a catalogued exception.
    pub fn known(exception: Exception) -> Self {
        Self {
            kind: FailureKind::Known(exception),
            cause: None,
        }
    }

    /// Failure the registry knows nothing about.
    pub fn unchecked(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind: FailureKind::Unchecked(message.into()),
            cause: None,
        }
    }

    /// Unchecked failure wrapping a lower-level error.
    pub fn unexpected<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        let error = error.into();
        Self {
            kind: FailureKind::Unchecked(Cow::Owned(error.to_string())),
            cause: Some(error),
        }
    }

    /// Attach the lower-level error this failure wraps.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.cause = Some(cause.into());
        self
    }

    /// Whether this failure is known or unchecked.
    pub fn kind(&self) -> &FailureKind {
        &self.kind
    }

    /// Registry key for known failures, the raw message otherwise.
    pub fn identifier(&self) -> &str {
        match &self.kind {
            FailureKind::Known(exception) => exception.id(),
            FailureKind::Unchecked(message) => message,
        }
    }

    /// The wrapped lower-level error, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Every error in the cause chain, rendered and joined with `": "`.
    pub fn cause_chain(&self) -> Option<String> {
        let first = self.source()?;
        let chain: Vec<String> = std::iter::successors(Some(first), |&e| e.source())
            .map(|e| e.to_string())
            .collect();
        Some(chain.join(": "))
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

impl From<Exception> for Failure {
    fn from(exception: Exception) -> Self {
        Self::known(exception)
    }
}

impl From<StoreError> for Failure {
    fn from(error: StoreError) -> Self {
        Self::unexpected(error)
    }
}

/// Failure parked in response extensions until the responder consumes it.
#[derive(Clone, Debug)]
pub(crate) struct RaisedFailure(pub(crate) Arc<Failure>);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        // Placeholder status for a router running without the responder.
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response
            .extensions_mut()
            .insert(RaisedFailure(Arc::new(self)));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Refused;

    #[derive(Debug, thiserror::Error)]
    #[error("send failed")]
    struct SendFailed(#[source] Refused);

    #[test]
    fn test_identifier() {
        assert_eq!(
            Failure::known(Exception::ThingWithNameAlreadyExists).identifier(),
            "THING_WITH_NAME_ALREADY_EXISTS"
        );
        assert_eq!(
            Failure::unchecked("random unchecked error").identifier(),
            "random unchecked error"
        );
    }

    #[test]
    fn test_cause_chain_walks_sources() {
        let failure = Failure::known(Exception::NotificationServiceUnavailable)
            .with_cause(SendFailed(Refused));

        assert!(failure.cause().is_some());
        assert_eq!(
            failure.cause_chain().as_deref(),
            Some("send failed: connection refused")
        );
        assert!(Failure::unchecked("boom").cause_chain().is_none());
    }

    #[test]
    fn test_unexpected_keeps_error_as_cause() {
        let failure = Failure::unexpected(Refused);
        assert_eq!(failure.kind(), &FailureKind::Unchecked("connection refused".into()));
        assert_eq!(failure.cause_chain().as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_into_response_parks_failure() {
        let response = Failure::unchecked("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let raised = response.extensions().get::<RaisedFailure>().unwrap();
        assert_eq!(raised.0.identifier(), "boom");
    }
}
