//! In-memory object store, used by tests and embedded deployments.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_core::traits::{ObjectStore, StoredObject};

/// Object store that keeps every blob in process memory.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    blobs: DashMap<String, Bytes>,
}

impl MemoryObjectStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn store_type(&self) -> &str {
        "memory"
    }

    async fn put(&self, key: &str, data: Bytes) -> AppResult<StoredObject> {
        let size_bytes = data.len() as u64;
        self.blobs.insert(key.to_string(), data);
        Ok(StoredObject {
            locator: key.to_string(),
            size_bytes,
        })
    }

    async fn get(&self, locator: &str) -> AppResult<Bytes> {
        self.blobs
            .get(locator)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {locator}")))
    }

    async fn delete(&self, locator: &str) -> AppResult<()> {
        self.blobs.remove(locator);
        Ok(())
    }

    async fn exists(&self, locator: &str) -> AppResult<bool> {
        Ok(self.blobs.contains_key(locator))
    }
}
