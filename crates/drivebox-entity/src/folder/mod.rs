//! Folder domain entities.

pub mod model;
pub mod sentinel;

pub use model::{CreateFolder, Folder, FolderEntry};
pub use sentinel::{BIN_FOLDER_ID, ROOT_FOLDER_ID};
