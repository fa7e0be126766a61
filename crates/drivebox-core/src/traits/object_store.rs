//! Object store trait for pluggable blob backends.
//!
//! The metadata layer never interprets locators; it records the locator a
//! `put` returned and hands it back verbatim on `get`/`delete`.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// The result of storing a blob.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StoredObject {
    /// Opaque locator to retrieve or delete the blob later.
    pub locator: String,
    /// Size of the stored blob in bytes.
    pub size_bytes: u64,
}

/// Trait for blob storage backends.
///
/// Implementations exist for the local filesystem and an in-memory store.
/// The trait is defined here in `drivebox-core` and implemented in
/// `drivebox-storage`.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "local", "memory").
    fn store_type(&self) -> &str;

    /// Store a blob under the given key and return its locator and size.
    async fn put(&self, key: &str, data: Bytes) -> AppResult<StoredObject>;

    /// Read a blob back by its locator.
    async fn get(&self, locator: &str) -> AppResult<Bytes>;

    /// Delete the blob behind a locator.
    async fn delete(&self, locator: &str) -> AppResult<()>;

    /// Check whether a blob exists behind a locator.
    async fn exists(&self, locator: &str) -> AppResult<bool>;
}
