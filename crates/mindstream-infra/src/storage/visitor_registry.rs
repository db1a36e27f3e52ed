//! JSON file visitor presence registry.
//!
//! The 24-hour window is applied when reading and the 100-record cap when
//! writing, so the file may still hold sightings that reads no longer show.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use mindstream_core::StoreError;
use mindstream_core::domain::{MAX_STORED_VISITORS, Visitor, normalize_visitor_name};
use mindstream_core::ports::{Clock, StorageHealth, VisitorRegistry};

use super::record_store::JsonRecordStore;

/// Visitor registry backed by a single JSON file.
pub struct JsonVisitorRegistry {
    store: JsonRecordStore<Visitor>,
    clock: Arc<dyn Clock>,
}

impl JsonVisitorRegistry {
    pub fn new(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: JsonRecordStore::new(path, Vec::new()),
            clock,
        }
    }

    pub async fn init(&self) -> Result<(), StoreError> {
        self.store.ensure().await
    }
}

#[async_trait]
impl VisitorRegistry for JsonVisitorRegistry {
    async fn list_active(&self) -> Result<Vec<Visitor>, StoreError> {
        let now = self.clock.now_millis();
        let mut visitors = self.store.load().await?;
        visitors.retain(|v| v.is_active_at(now));
        Ok(visitors)
    }

    async fn upsert(&self, name: &str) -> Result<Visitor, StoreError> {
        let name = normalize_visitor_name(name)?;
        let now = self.clock.now_millis();

        // Matched against the whole history so an expired name keeps its id.
        let visitor = self
            .store
            .update(move |visitors| {
                let visitor = match visitors.iter().position(|v| v.same_name(&name)) {
                    Some(idx) => {
                        let refreshed = visitors[idx].refreshed(name, now);
                        visitors[idx] = refreshed.clone();
                        refreshed
                    }
                    None => {
                        let fresh = Visitor::new(name, now);
                        visitors.insert(0, fresh.clone());
                        fresh
                    }
                };
                visitors.truncate(MAX_STORED_VISITORS);
                Ok(visitor)
            })
            .await?;

        tracing::debug!(visitor_id = %visitor.id, "Visitor seen");
        Ok(visitor)
    }

    fn health(&self) -> StorageHealth {
        StorageHealth {
            collection: "visitors",
            path: self.store.path().display().to_string(),
            corrupt: self.store.is_corrupt(),
        }
    }
}
