//! JSON file post repository.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use mindstream_core::StoreError;
use mindstream_core::domain::{Post, PostDraft, PostPatch};
use mindstream_core::ports::{Clock, PostRepository, StorageHealth};

use super::record_store::JsonRecordStore;
use super::seed::seed_posts;

const ENTITY: &str = "Post";

/// Post repository backed by a single JSON file.
pub struct JsonPostRepository {
    store: JsonRecordStore<Post>,
    clock: Arc<dyn Clock>,
}

impl JsonPostRepository {
    /// Repository at `path`, seeded with the editorial posts on first use.
    pub fn new(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        let seed = seed_posts(clock.now());
        Self::with_seed(path, seed, clock)
    }

    pub fn with_seed(path: impl Into<PathBuf>, seed: Vec<Post>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: JsonRecordStore::new(path, seed),
            clock,
        }
    }

    /// Create the backing file now instead of on first request.
    pub async fn init(&self) -> Result<(), StoreError> {
        self.store.ensure().await
    }
}

#[async_trait]
impl PostRepository for JsonPostRepository {
    async fn list_all(&self) -> Result<Vec<Post>, StoreError> {
        self.store.load().await
    }

    async fn get_by_id(&self, id: &str) -> Result<Post, StoreError> {
        self.store
            .load()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))
    }

    async fn create(&self, draft: PostDraft) -> Result<Post, StoreError> {
        let post = draft.into_post(self.clock.now())?;

        let created = self
            .store
            .update(move |posts| {
                posts.insert(0, post.clone());
                Ok(post)
            })
            .await?;

        tracing::info!(post_id = %created.id, title = %created.title, "Post created");
        Ok(created)
    }

    async fn update(&self, id: &str, patch: PostPatch) -> Result<Post, StoreError> {
        patch.validate()?;

        let updated = self
            .store
            .update(|posts| {
                let post = posts
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(|| StoreError::not_found(ENTITY, id))?;
                patch.apply(post);
                Ok(post.clone())
            })
            .await?;

        tracing::info!(post_id = %updated.id, "Post updated");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store
            .update(|posts| {
                let idx = posts
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or_else(|| StoreError::not_found(ENTITY, id))?;
                posts.remove(idx);
                Ok(())
            })
            .await?;

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    fn health(&self) -> StorageHealth {
        StorageHealth {
            collection: "posts",
            path: self.store.path().display().to_string(),
            corrupt: self.store.is_corrupt(),
        }
    }
}
