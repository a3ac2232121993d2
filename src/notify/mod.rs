//! Notification service collaborator.
//!
//! # Responsibilities
//! - Announce newly created things to the notification service
//! - Surface transport and status failures as `NotifyError`
//!
//! # Design Decisions
//! - No retries here; the caller decides what a failure means
//! - Per-call timeout comes from configuration

pub mod webhook;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::store::Thing;

pub use webhook::HttpNotifier;

/// Payload posted to the notification service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub event: &'static str,
    pub thing_id: Uuid,
    pub name: String,
}

impl Notification {
    pub fn thing_created(thing: &Thing) -> Self {
        Self {
            event: "thing.created",
            thing_id: thing.id,
            name: thing.name.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("notification service responded with {0}")]
    Rejected(reqwest::StatusCode),

    #[error("invalid notification endpoint: {0}")]
    InvalidEndpoint(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_notification(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Notifier used when notifications are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send_notification(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::debug!(
            event = notification.event,
            name = %notification.name,
            "Notifications disabled, skipping"
        );
        Ok(())
    }
}
