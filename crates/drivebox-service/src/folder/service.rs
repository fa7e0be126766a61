//! Folder lifecycle service.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_core::traits::ObjectStore;
use drivebox_core::types::ListScope;
use drivebox_database::repositories::content::ContentRepository;
use drivebox_database::repositories::file::FileRepository;
use drivebox_database::repositories::folder::FolderRepository;
use drivebox_entity::folder::sentinel::{ROOT_FOLDER_ID, is_sentinel};
use drivebox_entity::folder::{CreateFolder, Folder};
use drivebox_entity::listing::EntryListing;

use crate::context::TenantContext;
use crate::folder::validate_name;
use crate::trash::{DeleteOutcome, purge};
use crate::{begin_error, commit_error};

/// Folder operations over a tenant namespace.
#[derive(Debug, Clone)]
pub struct FolderService {
    pub(crate) pool: PgPool,
    pub(crate) folders: Arc<FolderRepository>,
    pub(crate) files: Arc<FileRepository>,
    pub(crate) contents: Arc<ContentRepository>,
    pub(crate) store: Arc<dyn ObjectStore>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        pool: PgPool,
        folders: Arc<FolderRepository>,
        files: Arc<FileRepository>,
        contents: Arc<ContentRepository>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            pool,
            folders,
            files,
            contents,
            store,
        }
    }

    /// List a folder's direct entries in the given scope.
    ///
    /// Folders come first, then files, both name-ordered. Listing the bin
    /// sentinel with [`ListScope::Trashed`] yields the trash view.
    pub async fn list_folder(
        &self,
        ctx: &TenantContext,
        folder_id: Uuid,
        scope: ListScope,
    ) -> AppResult<EntryListing> {
        let current = self
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        let subfolders = self.folders.children_with_counts(folder_id, scope).await?;
        let files = self.files.list_by_folder(folder_id, scope).await?;

        debug!(
            tenant = %ctx.tenant,
            folder_id = %folder_id,
            scope = ?scope,
            folders = subfolders.len(),
            files = files.len(),
            "Listed folder"
        );
        Ok(EntryListing::new(current, subfolders, files))
    }

    /// Create a folder under an existing, active parent.
    pub async fn create_folder(
        &self,
        ctx: &TenantContext,
        data: CreateFolder,
    ) -> AppResult<Folder> {
        validate_name(&data.name)?;

        let mut tx = self.pool.begin().await.map_err(begin_error)?;
        let parent = self
            .folders
            .find_for_update(&mut tx, data.parent_id)
            .await?
            .ok_or_else(|| AppError::not_found("Parent folder not found"))?;
        if parent.is_deleted {
            return Err(AppError::not_found("Parent folder not found"));
        }

        let folder = self.folders.create(&mut tx, &data).await?;
        tx.commit().await.map_err(commit_error)?;

        info!(
            tenant = %ctx.tenant,
            folder_id = %folder.id,
            parent_id = %data.parent_id,
            "Folder created"
        );
        Ok(folder)
    }

    /// Rename a folder. Sentinels cannot be renamed.
    pub async fn rename_folder(
        &self,
        ctx: &TenantContext,
        folder_id: Uuid,
        new_name: &str,
    ) -> AppResult<Folder> {
        if is_sentinel(folder_id) {
            return Err(AppError::validation("Cannot rename a system folder"));
        }
        validate_name(new_name)?;

        let folder = self
            .folders
            .rename(folder_id, new_name)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        info!(tenant = %ctx.tenant, folder_id = %folder_id, "Folder renamed");
        Ok(folder)
    }

    /// Move a folder under a different active parent.
    ///
    /// Rejects moves that would detach a sentinel, make a folder its own
    /// parent, or push a folder into its own subtree.
    pub async fn move_folder(
        &self,
        ctx: &TenantContext,
        folder_id: Uuid,
        target_parent_id: Uuid,
    ) -> AppResult<Folder> {
        if is_sentinel(folder_id) {
            return Err(AppError::validation("Cannot move a system folder"));
        }
        if folder_id == target_parent_id {
            return Err(AppError::validation("Cannot move a folder into itself"));
        }

        let mut tx = self.pool.begin().await.map_err(begin_error)?;
        self.folders
            .find_for_update(&mut tx, folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        let target = self
            .folders
            .find_for_update(&mut tx, target_parent_id)
            .await?
            .ok_or_else(|| AppError::not_found("Target folder not found"))?;
        if target.is_deleted {
            return Err(AppError::not_found("Target folder not found"));
        }

        // The target's ancestor chain reaching the moved folder means the
        // move would create a cycle.
        let ancestors = self.folders.ancestor_ids(&mut tx, target_parent_id).await?;
        if ancestors.contains(&folder_id) {
            return Err(AppError::validation(
                "Cannot move a folder into one of its descendants",
            ));
        }

        let moved = self
            .folders
            .update_parent(&mut tx, folder_id, target_parent_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        tx.commit().await.map_err(commit_error)?;

        info!(
            tenant = %ctx.tenant,
            folder_id = %folder_id,
            target_parent_id = %target_parent_id,
            "Folder moved"
        );
        Ok(moved)
    }

    /// Delete a folder.
    ///
    /// An active folder is trashed: its whole subtree (files included) is
    /// flagged deleted and the subtree root alone is re-parented into the
    /// bin, remembering where it came from. Deleting an already-trashed
    /// folder purges the subtree permanently and erases any content that
    /// held its last reference.
    pub async fn delete_folder(
        &self,
        ctx: &TenantContext,
        folder_id: Uuid,
    ) -> AppResult<DeleteOutcome> {
        if is_sentinel(folder_id) {
            return Err(AppError::validation("Cannot delete a system folder"));
        }

        let mut tx = self.pool.begin().await.map_err(begin_error)?;
        let folder = self
            .folders
            .find_for_update(&mut tx, folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        if !folder.is_deleted {
            let mut subtree = self.folders.descendant_ids(&mut tx, folder_id).await?;
            subtree.push(folder_id);
            self.folders.set_deleted(&mut tx, &subtree, true).await?;
            self.files
                .set_deleted_by_folders(&mut tx, &subtree, true)
                .await?;
            self.folders.stash_to_bin(&mut tx, folder_id).await?;
            tx.commit().await.map_err(commit_error)?;

            info!(
                tenant = %ctx.tenant,
                folder_id = %folder_id,
                subtree = subtree.len(),
                "Folder moved to bin"
            );
            return Ok(DeleteOutcome::Trashed);
        }

        let mut blobs = Vec::new();
        purge::purge_folder_subtree(
            &mut tx,
            &self.folders,
            &self.files,
            &self.contents,
            folder_id,
            &mut blobs,
        )
        .await?;
        tx.commit().await.map_err(commit_error)?;

        info!(
            tenant = %ctx.tenant,
            folder_id = %folder_id,
            blobs = blobs.len(),
            "Folder purged"
        );
        purge::delete_blobs_best_effort(self.store.as_ref(), blobs).await;
        Ok(DeleteOutcome::Purged)
    }

    /// Restore a trashed folder, bringing its whole subtree back.
    ///
    /// The folder returns to its remembered previous parent when that
    /// parent still exists and is active; otherwise it lands under the
    /// root sentinel. Restoring an active folder is a no-op.
    pub async fn restore_folder(&self, ctx: &TenantContext, folder_id: Uuid) -> AppResult<Folder> {
        if is_sentinel(folder_id) {
            return Err(AppError::validation("Cannot restore a system folder"));
        }

        let mut tx = self.pool.begin().await.map_err(begin_error)?;
        let folder = self
            .folders
            .find_for_update(&mut tx, folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        if !folder.is_deleted {
            return Ok(folder);
        }

        let target = match folder.previous_parent_id {
            Some(prev) => match self.folders.find_for_update(&mut tx, prev).await? {
                Some(parent) if !parent.is_deleted => prev,
                _ => ROOT_FOLDER_ID,
            },
            None => ROOT_FOLDER_ID,
        };

        let mut subtree = self.folders.descendant_ids(&mut tx, folder_id).await?;
        let restored = self
            .folders
            .restore_to(&mut tx, folder_id, target)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        self.folders.set_deleted(&mut tx, &subtree, false).await?;
        subtree.push(folder_id);
        self.files
            .set_deleted_by_folders(&mut tx, &subtree, false)
            .await?;
        tx.commit().await.map_err(commit_error)?;

        info!(
            tenant = %ctx.tenant,
            folder_id = %folder_id,
            target_parent_id = %target,
            "Folder restored"
        );
        Ok(restored)
    }

    /// Prefix search over folder and file names in the given scope.
    ///
    /// By default the search is limited to the given folder's direct
    /// entries; `global` widens it to the whole scope.
    pub async fn search_entries(
        &self,
        ctx: &TenantContext,
        folder_id: Uuid,
        query: &str,
        scope: ListScope,
        global: bool,
    ) -> AppResult<EntryListing> {
        let current = self
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        let parent = (!global).then_some(folder_id);
        let subfolders = self.folders.search(query, scope, parent).await?;
        let files = self.files.search(query, scope, parent).await?;

        debug!(
            tenant = %ctx.tenant,
            folder_id = %folder_id,
            global = global,
            hits = subfolders.len() + files.len(),
            "Searched entries"
        );
        Ok(EntryListing::new(current, subfolders, files))
    }
}
