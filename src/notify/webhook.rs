//! HTTP notifier posting JSON to a webhook endpoint.

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::config::NotificationConfig;
use crate::notify::{Notification, Notifier, NotifyError};

pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpNotifier {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, NotifyError> {
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(NotifyError::InvalidEndpoint(endpoint.to_string()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &NotificationConfig) -> Result<Self, NotifyError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| NotifyError::InvalidEndpoint(format!("{}: {}", config.endpoint, e)))?;
        Self::new(endpoint, Duration::from_secs(config.timeout_secs))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send_notification(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(notification)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status));
        }

        tracing::debug!(
            endpoint = %self.endpoint,
            event = notification.event,
            name = %notification.name,
            "Notification delivered"
        );
        Ok(())
    }
}
