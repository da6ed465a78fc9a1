//! Draft store trait.
//!
//! Defines the key/value persistence contract shared by autosave and recovery.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// An abstract key/value store for draft records.
///
/// Writes may be buffered until [`DraftStore::flush`]; readers on the same
/// instance always observe their own writes.
///
/// # Implementation Notes
///
/// Every operation is a single request/response; callers never hold a
/// transaction across calls. Autosave and recovery share one instance.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Reads a value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: Key present
    /// - `Ok(None)`: Key absent
    /// - `Err(_)`: Store could not be read
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Writes a value, replacing any previous one.
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Removes a key. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Makes every preceding write durable.
    async fn flush(&self) -> Result<()>;
}

/// In-process draft store.
///
/// Nothing survives the process; `flush` only counts calls.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    values: RwLock<HashMap<String, Value>>,
    flushes: AtomicUsize,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `flush` calls so far.
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    /// Copy of every stored entry.
    pub async fn snapshot(&self) -> HashMap<String, Value> {
        self.values.read().await.clone()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.values.write().await.remove(key);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
