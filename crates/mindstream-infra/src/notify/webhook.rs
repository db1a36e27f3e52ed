//! Webhook notifier - POSTs post changes to an automation endpoint.

use std::time::Duration;

use async_trait::async_trait;

use mindstream_core::ports::{NotifyError, PostEvent, PostNotifier};

/// Sends `{"action": "create"|"update", "post": {...}}` to a fixed URL.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self { url, client }
    }

    /// `None` when `WEBHOOK_URL` is unset or blank.
    pub fn from_env() -> Option<Self> {
        std::env::var("WEBHOOK_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(Self::new)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PostNotifier for WebhookNotifier {
    async fn notify(&self, event: &PostEvent) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        tracing::debug!(post_id = %event.post.id, action = ?event.action, "Webhook delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mindstream_core::domain::PostDraft;
    use mindstream_core::ports::PostAction;

    use super::*;

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_delivery_error() {
        // Nothing listens on the discard port.
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/hook".to_string());
        let event = PostEvent {
            action: PostAction::Create,
            post: PostDraft::new("A", "b").into_post(Utc::now()).unwrap(),
        };

        assert!(matches!(
            notifier.notify(&event).await,
            Err(NotifyError::Delivery(_))
        ));
    }

    #[test]
    fn test_event_payload_shape() {
        let event = PostEvent {
            action: PostAction::Update,
            post: PostDraft::new("A", "b").into_post(Utc::now()).unwrap(),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["action"], "update");
        assert_eq!(json["post"]["title"], "A");
    }
}
