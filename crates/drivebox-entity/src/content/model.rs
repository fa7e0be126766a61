//! Reference-counted content record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The record of actual stored bytes, decoupled from tree position.
///
/// `copy_count` counts file rows *beyond the first* that point at this
/// content. An upload starts at 0; each copy retains (+1); each file purge
/// releases (-1), and a release that finds the count already at 0 erases
/// the record and the backing blob.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Content {
    /// Unique content identifier.
    pub id: Uuid,
    /// Opaque locator within the backing object store.
    pub locator: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub mime_type: String,
    /// Number of copies beyond the original file row. Never negative.
    pub copy_count: i32,
    /// When the content was uploaded.
    pub created_at: DateTime<Utc>,
}

impl Content {
    /// Total number of file rows logically referencing this content.
    pub fn reference_count(&self) -> i64 {
        i64::from(self.copy_count) + 1
    }
}

/// Data required to create a new content record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContent {
    /// Opaque locator within the backing object store.
    pub locator: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub mime_type: String,
}
