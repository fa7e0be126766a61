//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::sentinel;

/// A folder in the tenant's hierarchy.
///
/// `parent_id` is `None` only for the two sentinel folders. While a folder
/// sits at the root of a trashed subtree, `previous_parent_id` remembers
/// where it came from so a restore can put it back.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (null only for the sentinels).
    pub parent_id: Option<Uuid>,
    /// The parent this folder had before it was moved to the bin.
    pub previous_parent_id: Option<Uuid>,
    /// Soft-delete flag. True iff this folder is the bin or sits beneath it.
    pub is_deleted: bool,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is one of the two fixed sentinel folders.
    pub fn is_sentinel(&self) -> bool {
        sentinel::is_sentinel(self.id)
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder.
    pub parent_id: Uuid,
}

/// A folder row annotated with its live entry count, as returned by
/// listings and search (the count is evaluated at query time, not cached).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FolderEntry {
    /// The folder itself.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub folder: Folder,
    /// Immediate subfolders plus files matching the listing scope.
    pub entry_count: i64,
}
