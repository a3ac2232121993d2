//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, timeout, failure responder)
//! - Bind server to listener and shut down on signal
//!
//! # Layer order (outermost first)
//! ```text
//! SetRequestId → Trace → PropagateRequestId → Timeout
//!     → intercept_failures → CatchPanic → handler
//! ```

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    timeout::TimeoutLayer,
    trace::{DefaultOnFailure, TraceLayer},
};
use tracing::Level;

use crate::exceptions::{intercept_failures, ErrorResponder, Failure};
use crate::http::handlers::{create_thing, root};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::notify::Notifier;
use crate::store::ThingStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ThingStore>,
    pub notifier: Arc<dyn Notifier>,
}

/// HTTP server for the thing service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState, responder: ErrorResponder, request_timeout: Duration) -> Self {
        Self {
            router: Self::build_router(state, responder, request_timeout),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The responder is installed here and only here; every route passes
    /// through it.
    #[allow(deprecated)]
    pub fn build_router(
        state: AppState,
        responder: ErrorResponder,
        request_timeout: Duration,
    ) -> Router {
        Router::new()
            .route("/", get(root))
            .route("/things", post(create_thing))
            .with_state(state)
            .layer(CatchPanicLayer::custom(panic_to_failure))
            .layer(middleware::from_fn_with_state(responder, intercept_failures))
            .layer(TimeoutLayer::new(request_timeout))
            .layer(propagate_request_id_layer())
            // Failures are recorded by the responder; keep 5xx out of the error log here.
            .layer(
                TraceLayer::new_for_http()
                    .on_failure(DefaultOnFailure::new().level(Level::DEBUG)),
            )
            .layer(set_request_id_layer())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Turn a handler panic into an unchecked failure.
fn panic_to_failure(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "non-string panic payload".to_string()
    };
    Failure::unchecked(format!("handler panicked: {message}")).into_response()
}
