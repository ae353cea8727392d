use std::time::Duration;

use async_trait::async_trait;

use crate::alert::render_token_alert;
use crate::feed::event::TokenCreationEvent;
use crate::metadata::TokenMetadata;
use crate::processor::calculator::DerivedMetrics;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Delivery boundary for enriched token alerts. Invoked at most once per
/// distinct mint; a delivery failure is logged by the caller and never
/// re-enters the dedup path.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        event: &TokenCreationEvent,
        metadata: &TokenMetadata,
        metrics: &DerivedMetrics,
    ) -> Result<(), NotifyError>;
}

/// Posts rendered alerts to a Discord incoming webhook.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(
        &self,
        event: &TokenCreationEvent,
        metadata: &TokenMetadata,
        metrics: &DerivedMetrics,
    ) -> Result<(), NotifyError> {
        let payload = render_token_alert(event, metadata, metrics);
        let response = self.client.post(&self.url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status()));
        }
        Ok(())
    }
}
