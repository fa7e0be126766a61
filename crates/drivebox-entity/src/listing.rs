//! Mixed folder+file listing payloads.

use serde::{Deserialize, Serialize};

use crate::file::FileEntry;
use crate::folder::{Folder, FolderEntry};

/// One entry in a mixed listing: either a folder or a file.
///
/// Serialized with a `kind` tag so callers get a typed variant instead of
/// an untyped heterogeneous array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entry {
    /// A folder with its live entry count.
    Folder(FolderEntry),
    /// A file with its content metadata.
    File(FileEntry),
}

impl Entry {
    /// The display name of the entry.
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(f) => &f.folder.name,
            Self::File(f) => &f.file.name,
        }
    }

    /// Whether the entry is soft-deleted.
    pub fn is_deleted(&self) -> bool {
        match self {
            Self::Folder(f) => f.folder.is_deleted,
            Self::File(f) => f.file.is_deleted,
        }
    }
}

/// A listing or search result: the folder being viewed plus its entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryListing {
    /// The folder the caller is looking at.
    pub current_folder: Folder,
    /// Folder entries first, then file entries.
    pub entries: Vec<Entry>,
}

impl EntryListing {
    /// Assemble a listing from separate folder and file result sets.
    pub fn new(current_folder: Folder, folders: Vec<FolderEntry>, files: Vec<FileEntry>) -> Self {
        let mut entries: Vec<Entry> = Vec::with_capacity(folders.len() + files.len());
        entries.extend(folders.into_iter().map(Entry::Folder));
        entries.extend(files.into_iter().map(Entry::File));
        Self {
            current_folder,
            entries,
        }
    }
}
