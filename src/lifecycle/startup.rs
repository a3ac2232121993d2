//! Startup orchestration.
//!
//! # Responsibilities
//! - Build and validate the exception registry
//! - Connect the data store and construct the notifier
//! - Bind the listener last, so traffic only arrives when ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and reaches `main`, not the
//!   responder
//! - Subsystems initialize in order, not concurrently

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{NotificationConfig, ServerConfig};
use crate::exceptions::{ErrorResponder, FailureSink, Registry, RegistryError};
use crate::http::{AppState, HttpServer};
use crate::notify::{DisabledNotifier, HttpNotifier, Notifier, NotifyError};
use crate::store::{MemoryThingStore, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("exception registry is malformed: {0}")]
    Registry(#[from] RegistryError),

    #[error("data store connection failed: {0}")]
    Store(#[from] StoreError),

    #[error("notifier setup failed: {0}")]
    Notifier(#[from] NotifyError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// A server ready to accept connections.
pub struct Started {
    pub server: HttpServer,
    pub listener: TcpListener,
}

/// Bring every dependency up, then bind the listener.
pub async fn bootstrap(
    config: &ServerConfig,
    sink: Arc<dyn FailureSink>,
) -> Result<Started, StartupError> {
    let registry = Arc::new(Registry::builtin()?);
    tracing::debug!(exceptions = registry.len(), "Exception registry built");

    let store = MemoryThingStore::connect(&config.database).await?;
    let notifier = build_notifier(&config.notifications)?;

    let state = AppState {
        store: Arc::new(store),
        notifier,
    };
    let responder = ErrorResponder::new(registry, sink);
    let server = HttpServer::new(
        state,
        responder,
        Duration::from_secs(config.timeouts.request_secs),
    );

    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    Ok(Started { server, listener })
}

fn build_notifier(config: &NotificationConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    if !config.enabled {
        tracing::warn!("Notifications disabled");
        return Ok(Arc::new(DisabledNotifier));
    }
    let notifier = HttpNotifier::from_config(config)?;
    tracing::info!(endpoint = %notifier.endpoint(), "Notifier configured");
    Ok(Arc::new(notifier))
}
