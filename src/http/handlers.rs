//! Request handlers.
//!
//! Handlers never build error responses. Every failure is returned as a
//! [`Failure`] and left to the responder.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::exceptions::{Exception, Failure};
use crate::http::server::AppState;
use crate::notify::{Notification, Notifier};
use crate::observability::metrics;
use crate::store::{StoreError, Thing};

/// Body of `POST /things`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewThing {
    pub name: String,
}

/// `GET /`. Always fails with an unchecked error.
pub async fn root() -> Result<StatusCode, Failure> {
    Err(Failure::unchecked("random unchecked error"))
}

/// `POST /things`.
pub async fn create_thing(
    State(state): State<AppState>,
    payload: Result<Json<NewThing>, JsonRejection>,
) -> Result<StatusCode, Failure> {
    let Json(new_thing) = payload
        .map_err(|rejection| Failure::known(Exception::InvalidThingPayload).with_cause(rejection))?;

    let name = new_thing.name.trim();
    if name.is_empty() {
        return Err(Failure::known(Exception::InvalidThingPayload));
    }

    if state.store.find_by_name(name).await?.is_some() {
        return Err(Failure::known(Exception::ThingWithNameAlreadyExists));
    }

    let thing = Thing::new(name);
    notify(state.notifier.as_ref(), &Notification::thing_created(&thing)).await?;

    state.store.insert(thing).await.map_err(|e| match e {
        StoreError::Duplicate(_) => {
            Failure::known(Exception::ThingWithNameAlreadyExists).with_cause(e)
        }
        other => Failure::from(other),
    })?;

    tracing::info!(name = %name, "Thing created");
    metrics::record_thing_created();
    Ok(StatusCode::CREATED)
}

/// Send a notification, translating any failure into a known exception.
async fn notify(notifier: &dyn Notifier, notification: &Notification) -> Result<(), Failure> {
    notifier
        .send_notification(notification)
        .await
        .map_err(|e| Failure::known(Exception::NotificationServiceUnavailable).with_cause(e))
}
