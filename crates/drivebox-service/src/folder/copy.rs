//! Deep folder copy.
//!
//! Copying a folder duplicates the metadata tree while sharing every file's
//! content: each copied file bumps its content's reference count instead of
//! duplicating bytes in the object store.

use std::collections::HashMap;

use tracing::info;
use uuid::Uuid;

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_entity::file::CreateFile;
use drivebox_entity::folder::Folder;
use drivebox_entity::folder::sentinel::{ROOT_FOLDER_ID, is_sentinel};

use crate::context::TenantContext;
use crate::folder::FolderService;
use crate::{begin_error, commit_error};

impl FolderService {
    /// Copy a folder and its entire subtree.
    ///
    /// The copy's root is named `copy_<name>` and lands next to the
    /// original; copying a trashed folder produces an active copy at the
    /// original's remembered location (or under root) rather than a live
    /// tree inside the bin. Descendant folders and files keep their names.
    pub async fn copy_folder(&self, ctx: &TenantContext, folder_id: Uuid) -> AppResult<Folder> {
        if is_sentinel(folder_id) {
            return Err(AppError::validation("Cannot copy a system folder"));
        }

        let mut tx = self.pool.begin().await.map_err(begin_error)?;
        let source = self
            .folders
            .find_for_update(&mut tx, folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        let root_parent = if source.is_deleted {
            match source.previous_parent_id {
                Some(prev) => match self.folders.find_for_update(&mut tx, prev).await? {
                    Some(parent) if !parent.is_deleted => prev,
                    _ => ROOT_FOLDER_ID,
                },
                None => ROOT_FOLDER_ID,
            }
        } else {
            source.parent_id.unwrap_or(ROOT_FOLDER_ID)
        };

        // Shallowest-first order keeps every insert's parent already present.
        let subtree = self.folders.fetch_subtree(&mut tx, folder_id).await?;
        let mut id_map: HashMap<Uuid, Uuid> = HashMap::with_capacity(subtree.len());
        let mut copied_root: Option<Folder> = None;

        for original in &subtree {
            let new_id = Uuid::new_v4();
            id_map.insert(original.id, new_id);

            let (name, parent) = if original.id == folder_id {
                (format!("copy_{}", original.name), Some(root_parent))
            } else {
                let parent = original
                    .parent_id
                    .and_then(|p| id_map.get(&p).copied())
                    .ok_or_else(|| {
                        AppError::internal("Subtree copy encountered a detached folder")
                    })?;
                (original.name.clone(), Some(parent))
            };

            let inserted = self.folders.insert_copy(&mut tx, new_id, &name, parent).await?;
            if original.id == folder_id {
                copied_root = Some(inserted);
            }
        }

        let old_ids: Vec<Uuid> = subtree.iter().map(|f| f.id).collect();
        let originals = self.files.find_by_folders(&mut tx, &old_ids).await?;
        for file in &originals {
            let new_folder = id_map.get(&file.folder_id).copied().ok_or_else(|| {
                AppError::internal("Subtree copy encountered a detached file")
            })?;
            self.contents.retain(&mut tx, file.content_id).await?;
            self.files
                .create(
                    &mut tx,
                    &CreateFile {
                        folder_id: new_folder,
                        content_id: file.content_id,
                        name: file.name.clone(),
                    },
                )
                .await?;
        }

        let root =
            copied_root.ok_or_else(|| AppError::internal("Subtree copy produced no root"))?;
        tx.commit().await.map_err(commit_error)?;

        info!(
            tenant = %ctx.tenant,
            source_id = %folder_id,
            copy_id = %root.id,
            folders = subtree.len(),
            files = originals.len(),
            "Folder copied"
        );
        Ok(root)
    }
}
