use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Post, PostDraft, PostPatch, Visitor};
use crate::error::StoreError;

/// Health of one backing collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageHealth {
    pub collection: &'static str,
    pub path: String,
    /// The last load found unparseable content and served an empty collection.
    pub corrupt: bool,
}

/// Post repository - CRUD over the blog post collection.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Every stored post, in stored order (newest first unless edited by hand).
    async fn list_all(&self) -> Result<Vec<Post>, StoreError>;

    /// Find a post by its id.
    async fn get_by_id(&self, id: &str) -> Result<Post, StoreError>;

    /// Validate, fill defaults, insert at the front and persist.
    async fn create(&self, draft: PostDraft) -> Result<Post, StoreError>;

    /// Overlay `patch` onto the post with `id`. The id never changes.
    async fn update(&self, id: &str, patch: PostPatch) -> Result<Post, StoreError>;

    /// Remove the post with `id`.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    fn health(&self) -> StorageHealth;
}

/// Visitor presence registry - deduplicated, capped, time-windowed sightings.
#[async_trait]
pub trait VisitorRegistry: Send + Sync {
    /// Visitors seen within the last 24 hours, in stored order.
    async fn list_active(&self) -> Result<Vec<Visitor>, StoreError>;

    /// Record a sighting of `name`, reusing the id of an earlier sighting.
    async fn upsert(&self, name: &str) -> Result<Visitor, StoreError>;

    fn health(&self) -> StorageHealth;
}
