//! File-backed draft store.

use crate::storage::AtomicFile;
use async_trait::async_trait;
use dotpad_core::draft::DraftStore;
use dotpad_core::error::{DotpadError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};

type Entries = BTreeMap<String, Value>;

/// A [`DraftStore`] kept in memory and written to one JSON object on `flush`.
///
/// `get`/`set`/`delete` only touch the in-memory map; `flush` writes the whole
/// map atomically (temp file, fsync, rename). Flushes are serialized: they
/// share one temp file, and a later flush must never be overtaken by an older
/// snapshot.
#[derive(Debug)]
pub struct JsonDraftStore {
    file: AtomicFile<Entries>,
    entries: RwLock<Entries>,
    flush_lock: Mutex<()>,
}

impl JsonDraftStore {
    /// Opens the store at `path`.
    ///
    /// A missing or blank file is an empty store; a corrupt one is an error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let file = AtomicFile::<Entries>::json(path.into());
        let loader = file.clone();
        let entries = tokio::task::spawn_blocking(move || loader.load())
            .await
            .map_err(|e| DotpadError::internal(format!("Draft store load task failed: {}", e)))??
            .unwrap_or_default();

        tracing::debug!(
            "[DraftStore] Opened {} ({} keys)",
            file.path().display(),
            entries.len()
        );

        Ok(Self {
            file,
            entries: RwLock::new(entries),
            flush_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Keys currently held, in sorted order.
    pub async fn keys(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl DraftStore for JsonDraftStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let _guard = self.flush_lock.lock().await;
        let snapshot = self.entries.read().await.clone();
        let file = self.file.clone();

        tokio::task::spawn_blocking(move || file.save(&snapshot))
            .await
            .map_err(|e| DotpadError::internal(format!("Draft store flush task failed: {}", e)))?
    }
}
