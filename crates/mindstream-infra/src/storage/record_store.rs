//! Durable record store - one JSON array per file.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use mindstream_core::StoreError;

type PathLock = Arc<Mutex<()>>;

/// One async lock per absolute path, shared by every store in the process.
fn path_lock(path: &Path) -> PathLock {
    static LOCKS: OnceLock<std::sync::Mutex<HashMap<PathBuf, PathLock>>> = OnceLock::new();

    let mut locks = LOCKS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    locks.entry(path.to_path_buf()).or_default().clone()
}

/// A homogeneous collection persisted as a pretty-printed JSON array.
///
/// Every call goes to disk; nothing is cached between calls. Saves write a
/// sibling temp file and rename it over the target, so readers see either
/// the old or the new collection. Mutations made through [`update`] are
/// serialized per path within the process.
///
/// [`update`]: JsonRecordStore::update
pub struct JsonRecordStore<T> {
    path: PathBuf,
    seed: Vec<T>,
    lock: PathLock,
    corrupt: AtomicBool,
}

impl<T> JsonRecordStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Create a store for `path`, seeded with `seed` on first use.
    pub fn new(path: impl Into<PathBuf>, seed: Vec<T>) -> Self {
        let path = path.into();
        let path = std::path::absolute(&path).unwrap_or(path);
        let lock = path_lock(&path);

        Self {
            path,
            seed,
            lock,
            corrupt: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the most recent load found unparseable content.
    pub fn is_corrupt(&self) -> bool {
        self.corrupt.load(Ordering::Relaxed)
    }

    /// Create the parent directory and the seeded file if either is missing.
    /// An existing file is never touched.
    ///
    /// The seed is written to a synced temp file and hard-linked into place,
    /// so the target only ever appears complete and a racing `ensure` that
    /// loses the link leaves the winner's file alone.
    pub async fn ensure(&self) -> Result<(), StoreError> {
        if fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(());
        }

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| self.io_error("create directory for", e))?;
        }

        let seed = serde_json::to_vec_pretty(&self.seed)
            .map_err(|e| StoreError::StorageUnavailable(e.to_string()))?;

        let tmp = self.temp_path();
        if let Err(e) = write_synced(&tmp, &seed).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(self.io_error("seed", e));
        }

        let linked = fs::hard_link(&tmp, &self.path).await;
        let _ = fs::remove_file(&tmp).await;

        match linked {
            Ok(()) => {
                tracing::info!(
                    path = %self.path.display(),
                    records = self.seed.len(),
                    "Seeded record store"
                );
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(self.io_error("create", e)),
        }
    }

    /// Read the whole collection. Unparseable content yields an empty
    /// collection and marks the store as corrupt.
    pub async fn load(&self) -> Result<Vec<T>, StoreError> {
        self.ensure().await?;

        let raw = fs::read(&self.path)
            .await
            .map_err(|e| self.io_error("read", e))?;

        match serde_json::from_slice::<Vec<T>>(&raw) {
            Ok(records) => {
                self.corrupt.store(false, Ordering::Relaxed);
                tracing::debug!(
                    path = %self.path.display(),
                    records = records.len(),
                    "Loaded records"
                );
                Ok(records)
            }
            Err(e) => {
                self.corrupt.store(true, Ordering::Relaxed);
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Record file is not a valid JSON array, serving an empty collection"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Replace the whole file with `records`.
    pub async fn save(&self, records: &[T]) -> Result<(), StoreError> {
        self.ensure().await?;

        if self.is_corrupt() {
            self.quarantine().await;
        }

        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| StoreError::StorageUnavailable(e.to_string()))?;

        let tmp = self.temp_path();
        if let Err(e) = write_synced(&tmp, &json).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(self.io_error("write", e));
        }
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(self.io_error("replace", e));
        }

        self.corrupt.store(false, Ordering::Relaxed);
        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "Saved records"
        );
        Ok(())
    }

    /// Load, mutate and save while holding the path lock.
    ///
    /// If `mutate` fails nothing is written.
    pub async fn update<R, F>(&self, mutate: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, StoreError> + Send,
        R: Send,
    {
        let _guard = self.lock.lock().await;

        let mut records = self.load().await?;
        let output = mutate(&mut records)?;
        self.save(&records).await?;

        Ok(output)
    }

    /// Keep a copy of a corrupt file before it is overwritten.
    async fn quarantine(&self) {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let backup = self.sibling(&format!("corrupt-{stamp}"));

        match fs::copy(&self.path, &backup).await {
            Ok(_) => tracing::warn!(
                path = %self.path.display(),
                backup = %backup.display(),
                "Preserved corrupt record file before overwrite"
            ),
            Err(e) => tracing::error!(
                path = %self.path.display(),
                error = %e,
                "Could not preserve corrupt record file"
            ),
        }
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(&format!("{}.tmp", uuid::Uuid::new_v4().simple()))
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "records".to_string());
        self.path.with_file_name(format!("{name}.{suffix}"))
    }

    fn io_error(&self, action: &str, err: std::io::Error) -> StoreError {
        tracing::error!(path = %self.path.display(), error = %err, "Failed to {} record file", action);
        StoreError::StorageUnavailable(format!(
            "failed to {} {}: {}",
            action,
            self.path.display(),
            err
        ))
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: u32,
        text: String,
    }

    fn note(id: u32, text: &str) -> Note {
        Note {
            id,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_ensure_creates_directories_and_seed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/notes.json");
        let store = JsonRecordStore::new(&path, vec![note(1, "seed")]);

        store.ensure().await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Note> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, vec![note(1, "seed")]);
    }

    #[tokio::test]
    async fn test_ensure_leaves_existing_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, r#"[{"id":7,"text":"mine"}]"#).unwrap();

        let store = JsonRecordStore::new(&path, vec![note(1, "seed")]);
        store.ensure().await.unwrap();
        store.ensure().await.unwrap();

        assert_eq!(store.load().await.unwrap(), vec![note(7, "mine")]);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonRecordStore::new(dir.path().join("notes.json"), Vec::new());

        store.save(&[note(1, "a"), note(2, "b")]).await.unwrap();

        assert_eq!(
            store.load().await.unwrap(),
            vec![note(1, "a"), note(2, "b")]
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty_and_is_flagged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, "[{\"id\": 1, \"te").unwrap();

        let store: JsonRecordStore<Note> = JsonRecordStore::new(&path, Vec::new());

        assert!(store.load().await.unwrap().is_empty());
        assert!(store.is_corrupt());
    }

    #[tokio::test]
    async fn test_save_over_corrupt_file_keeps_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonRecordStore::new(&path, Vec::new());
        store.update(|notes| {
            notes.push(note(1, "fresh"));
            Ok(())
        })
        .await
        .unwrap();

        assert!(!store.is_corrupt());
        assert_eq!(store.load().await.unwrap(), vec![note(1, "fresh")]);

        let backups: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().contains(".corrupt-"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(std::fs::read_to_string(backups[0].path()).unwrap(), "not json");
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = JsonRecordStore::new(dir.path().join("notes.json"), Vec::<Note>::new());

        store.save(&[note(1, "a")]).await.unwrap();
        store.save(&[note(2, "b")]).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["notes.json".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_mutation_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = JsonRecordStore::new(dir.path().join("notes.json"), vec![note(1, "a")]);

        let result: Result<(), _> = store
            .update(|notes| {
                notes.clear();
                Err(StoreError::validation("nope"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(store.load().await.unwrap(), vec![note(1, "a")]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.json");

        let mut handles = Vec::new();
        for i in 0..20u32 {
            // Separate store instances on one path still share the lock.
            let store = JsonRecordStore::new(&path, Vec::<Note>::new());
            handles.push(tokio::spawn(async move {
                store
                    .update(|notes| {
                        notes.push(note(i, "x"));
                        Ok(())
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let store = JsonRecordStore::new(&path, Vec::<Note>::new());
        assert_eq!(store.load().await.unwrap().len(), 20);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_loads_see_the_full_seed() {
        let seed: Vec<Note> = (0..5000).map(|i| note(i, "seeded record")).collect();

        for round in 0..10 {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join(format!("notes-{round}.json"));

            let mut handles = Vec::new();
            for _ in 0..16 {
                let store = JsonRecordStore::new(&path, seed.clone());
                handles.push(tokio::spawn(async move {
                    let loaded = store.load().await.unwrap();
                    (loaded.len(), store.is_corrupt())
                }));
            }
            for handle in handles {
                let (len, corrupt) = handle.await.unwrap();
                assert_eq!(len, 5000);
                assert!(!corrupt);
            }

            let names: Vec<String> = std::fs::read_dir(dir.path())
                .unwrap()
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            assert_eq!(names, vec![format!("notes-{round}.json")]);
        }
    }

    #[tokio::test]
    async fn test_unwritable_location_is_storage_unavailable() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();

        let store = JsonRecordStore::new(blocker.join("notes.json"), Vec::<Note>::new());

        assert!(matches!(
            store.load().await,
            Err(StoreError::StorageUnavailable(_))
        ));
    }
}
