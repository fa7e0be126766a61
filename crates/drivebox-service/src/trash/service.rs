//! Bin-wide bulk operations: empty the bin, restore everything.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use drivebox_core::result::AppResult;
use drivebox_core::traits::ObjectStore;
use drivebox_database::repositories::content::ContentRepository;
use drivebox_database::repositories::file::FileRepository;
use drivebox_database::repositories::folder::FolderRepository;
use drivebox_entity::folder::sentinel::{BIN_FOLDER_ID, ROOT_FOLDER_ID};

use crate::context::TenantContext;
use crate::trash::purge;
use crate::{begin_error, commit_error};

/// Bulk trash operations over a tenant namespace.
#[derive(Debug, Clone)]
pub struct TrashService {
    pool: PgPool,
    folders: Arc<FolderRepository>,
    files: Arc<FileRepository>,
    contents: Arc<ContentRepository>,
    store: Arc<dyn ObjectStore>,
}

impl TrashService {
    /// Creates a new trash service.
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

    /// Permanently delete everything in the bin.
    ///
    /// Iterates the bin's direct children: loose files first, then each
    /// trashed subtree recursively. One transaction covers all metadata;
    /// freed blobs are erased after commit.
    pub async fn purge_bin(&self, ctx: &TenantContext) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(begin_error)?;
        let mut blobs = Vec::new();

        let bin_files = self
            .files
            .find_by_folders(&mut tx, &[BIN_FOLDER_ID])
            .await?;
        for file in &bin_files {
            purge::purge_file(&mut tx, &self.files, &self.contents, file, &mut blobs).await?;
        }

        let trashed_roots = self.folders.children_of(&mut tx, BIN_FOLDER_ID).await?;
        for folder in &trashed_roots {
            purge::purge_folder_subtree(
                &mut tx,
                &self.folders,
                &self.files,
                &self.contents,
                folder.id,
                &mut blobs,
            )
            .await?;
        }

        tx.commit().await.map_err(commit_error)?;

        info!(
            tenant = %ctx.tenant,
            files = bin_files.len(),
            folders = trashed_roots.len(),
            blobs = blobs.len(),
            "Bin emptied"
        );

        purge::delete_blobs_best_effort(self.store.as_ref(), blobs).await;
        Ok(())
    }

    /// Restore every trashed folder and file tenant-wide.
    ///
    /// Deliberately not hierarchy-aware: the single-node restore rule is
    /// applied independently to each trashed node, so a node whose
    /// previous parent disappeared in the meantime lands under the root
    /// sentinel instead of inside its old subtree.
    pub async fn restore_all(&self, ctx: &TenantContext) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(begin_error)?;

        let trashed_folders = self.folders.find_trashed(&mut tx).await?;
        for folder in &trashed_folders {
            let target = match folder.previous_parent_id {
                Some(prev) => match self.folders.find_for_update(&mut tx, prev).await? {
                    Some(parent) if !parent.is_deleted => prev,
                    _ => ROOT_FOLDER_ID,
                },
                // Never individually stashed: keep its place, clear the flag.
                None => folder.parent_id.unwrap_or(ROOT_FOLDER_ID),
            };
            self.folders.restore_to(&mut tx, folder.id, target).await?;
        }

        let trashed_files = self.files.find_trashed(&mut tx).await?;
        for file in &trashed_files {
            let target = match file.previous_folder_id {
                Some(prev) => match self.folders.find_for_update(&mut tx, prev).await? {
                    Some(parent) if !parent.is_deleted => prev,
                    _ => ROOT_FOLDER_ID,
                },
                None => file.folder_id,
            };
            self.files.restore_to(&mut tx, file.id, target).await?;
        }

        tx.commit().await.map_err(commit_error)?;

        info!(
            tenant = %ctx.tenant,
            folders = trashed_folders.len(),
            files = trashed_files.len(),
            "All trashed entries restored"
        );
        Ok(())
    }
}
