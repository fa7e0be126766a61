//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file node in the tenant's hierarchy.
///
/// A file always has a valid parent folder; trashing re-points it at the
/// bin rather than orphaning it. The actual bytes live behind the
/// reference-counted [`Content`](crate::content::Content) record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The folder containing this file (never null).
    pub folder_id: Uuid,
    /// The folder this file was in before it was moved to the bin.
    pub previous_folder_id: Option<Uuid>,
    /// The content record holding the stored bytes.
    pub content_id: Uuid,
    /// Display name (including extension).
    pub name: String,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The folder to place the file in.
    pub folder_id: Uuid,
    /// The content record the file points at.
    pub content_id: Uuid,
    /// Display name.
    pub name: String,
}

/// A file row joined with its content metadata, as returned by listings
/// and search.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileEntry {
    /// The file itself.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub file: File,
    /// Opaque locator of the stored bytes.
    pub locator: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub mime_type: String,
}
