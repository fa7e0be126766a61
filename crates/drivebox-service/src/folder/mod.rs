//! Folder operations: listing, creation, structure, and lifecycle.

pub mod copy;
pub mod service;

pub use service::FolderService;

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;

/// Longest display name accepted for folders and files.
pub const MAX_NAME_LEN: usize = 255;

/// Validate a user-supplied display name.
pub(crate) fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(AppError::validation("Name exceeds 255 characters"));
    }
    if name.contains('/') || name.contains('\0') {
        return Err(AppError::validation("Name contains forbidden characters"));
    }
    Ok(())
}
