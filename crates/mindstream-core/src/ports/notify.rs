//! Post change notification port.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::Post;

/// What happened to the post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostAction {
    Create,
    Update,
}

/// Payload delivered to the notification collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct PostEvent {
    pub action: PostAction,
    pub post: Post,
}

/// Best-effort delivery of post changes. Callers must not let a failure
/// affect the save that triggered it.
#[async_trait]
pub trait PostNotifier: Send + Sync {
    async fn notify(&self, event: &PostEvent) -> Result<(), NotifyError>;
}

/// Notification errors.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Receiver rejected notification with status {0}")]
    Rejected(u16),
}
