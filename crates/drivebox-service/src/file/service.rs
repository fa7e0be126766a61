//! File lifecycle service.

use std::sync::Arc;

use bytes::Bytes;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_core::traits::ObjectStore;
use drivebox_database::repositories::content::ContentRepository;
use drivebox_database::repositories::file::FileRepository;
use drivebox_database::repositories::folder::FolderRepository;
use drivebox_entity::content::CreateContent;
use drivebox_entity::file::{CreateFile, File, FileEntry};
use drivebox_entity::folder::sentinel::ROOT_FOLDER_ID;

use crate::context::TenantContext;
use crate::folder::validate_name;
use crate::trash::{DeleteOutcome, purge};
use crate::{begin_error, commit_error};

/// An upload: raw bytes plus the metadata to file them under.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Folder to place the file in.
    pub folder_id: Uuid,
    /// Display name, extension included.
    pub name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// The bytes to store.
    pub data: Bytes,
}

/// File operations over a tenant namespace.
#[derive(Debug, Clone)]
pub struct FileService {
    pool: PgPool,
    folders: Arc<FolderRepository>,
    files: Arc<FileRepository>,
    contents: Arc<ContentRepository>,
    store: Arc<dyn ObjectStore>,
}

impl FileService {
    /// Creates a new file service.
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

    /// Upload a new file into an active folder.
    ///
    /// The bytes go to the object store before the metadata transaction
    /// opens; if the transaction then fails, the orphaned blob is erased
    /// best-effort on the way out.
    pub async fn upload(&self, ctx: &TenantContext, request: UploadRequest) -> AppResult<FileEntry> {
        validate_name(&request.name)?;

        let key = format!("uploads/{}/{}", Uuid::new_v4(), request.name);
        let stored = self.store.put(&key, request.data.clone()).await?;

        let result = self.record_upload(&request, &stored.locator, stored.size_bytes).await;
        match result {
            Ok(entry) => {
                info!(
                    tenant = %ctx.tenant,
                    file_id = %entry.file.id,
                    folder_id = %request.folder_id,
                    size_bytes = stored.size_bytes,
                    "File uploaded"
                );
                Ok(entry)
            }
            Err(e) => {
                purge::delete_blobs_best_effort(self.store.as_ref(), vec![stored.locator]).await;
                Err(e)
            }
        }
    }

    async fn record_upload(
        &self,
        request: &UploadRequest,
        locator: &str,
        size_bytes: u64,
    ) -> AppResult<FileEntry> {
        let mut tx = self.pool.begin().await.map_err(begin_error)?;
        let parent = self
            .folders
            .find_for_update(&mut tx, request.folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        if parent.is_deleted {
            return Err(AppError::not_found("Folder not found"));
        }

        let content = self
            .contents
            .create(
                &mut tx,
                &CreateContent {
                    locator: locator.to_string(),
                    size_bytes: i64::try_from(size_bytes)
                        .map_err(|_| AppError::validation("Upload exceeds supported size"))?,
                    mime_type: request.mime_type.clone(),
                },
            )
            .await?;
        let file = self
            .files
            .create(
                &mut tx,
                &CreateFile {
                    folder_id: request.folder_id,
                    content_id: content.id,
                    name: request.name.clone(),
                },
            )
            .await?;
        tx.commit().await.map_err(commit_error)?;

        Ok(FileEntry {
            file,
            locator: content.locator,
            size_bytes: content.size_bytes,
            mime_type: content.mime_type,
        })
    }

    /// Fetch a file's metadata joined with its content record.
    pub async fn get_file(&self, _ctx: &TenantContext, file_id: Uuid) -> AppResult<FileEntry> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        let content = self
            .contents
            .find_by_id(file.content_id)
            .await?
            .ok_or_else(|| AppError::not_found("Content not found"))?;
        Ok(FileEntry {
            file,
            locator: content.locator,
            size_bytes: content.size_bytes,
            mime_type: content.mime_type,
        })
    }

    /// Read a file's bytes back from the object store.
    pub async fn download(&self, ctx: &TenantContext, file_id: Uuid) -> AppResult<(FileEntry, Bytes)> {
        let entry = self.get_file(ctx, file_id).await?;
        let data = self.store.get(&entry.locator).await?;
        debug!(
            tenant = %ctx.tenant,
            file_id = %file_id,
            size_bytes = data.len(),
            "File downloaded"
        );
        Ok((entry, data))
    }

    /// Rename a file.
    pub async fn rename_file(
        &self,
        ctx: &TenantContext,
        file_id: Uuid,
        new_name: &str,
    ) -> AppResult<File> {
        validate_name(new_name)?;
        let file = self
            .files
            .rename(file_id, new_name)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        info!(tenant = %ctx.tenant, file_id = %file_id, "File renamed");
        Ok(file)
    }

    /// Move a file into a different active folder.
    pub async fn move_file(
        &self,
        ctx: &TenantContext,
        file_id: Uuid,
        target_folder_id: Uuid,
    ) -> AppResult<File> {
        let mut tx = self.pool.begin().await.map_err(begin_error)?;
        self.files
            .find_for_update(&mut tx, file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        let target = self
            .folders
            .find_for_update(&mut tx, target_folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Target folder not found"))?;
        if target.is_deleted {
            return Err(AppError::not_found("Target folder not found"));
        }

        let moved = self
            .files
            .update_parent(&mut tx, file_id, target_folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        tx.commit().await.map_err(commit_error)?;

        info!(
            tenant = %ctx.tenant,
            file_id = %file_id,
            target_folder_id = %target_folder_id,
            "File moved"
        );
        Ok(moved)
    }

    /// Delete a file.
    ///
    /// An active file is trashed into the bin; deleting an already-trashed
    /// file releases its content reference and removes the record, erasing
    /// the blob only if this was the last reference.
    pub async fn delete_file(&self, ctx: &TenantContext, file_id: Uuid) -> AppResult<DeleteOutcome> {
        let mut tx = self.pool.begin().await.map_err(begin_error)?;
        let file = self
            .files
            .find_for_update(&mut tx, file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        if !file.is_deleted {
            self.files.stash_to_bin(&mut tx, file_id).await?;
            tx.commit().await.map_err(commit_error)?;
            info!(tenant = %ctx.tenant, file_id = %file_id, "File moved to bin");
            return Ok(DeleteOutcome::Trashed);
        }

        let mut blobs = Vec::new();
        purge::purge_file(&mut tx, &self.files, &self.contents, &file, &mut blobs).await?;
        tx.commit().await.map_err(commit_error)?;

        info!(
            tenant = %ctx.tenant,
            file_id = %file_id,
            blobs = blobs.len(),
            "File purged"
        );
        purge::delete_blobs_best_effort(self.store.as_ref(), blobs).await;
        Ok(DeleteOutcome::Purged)
    }

    /// Restore a trashed file.
    ///
    /// The file returns to its remembered previous folder when that folder
    /// still exists and is active; otherwise it lands under the root
    /// sentinel. Restoring an active file is a no-op.
    pub async fn restore_file(&self, ctx: &TenantContext, file_id: Uuid) -> AppResult<File> {
        let mut tx = self.pool.begin().await.map_err(begin_error)?;
        let file = self
            .files
            .find_for_update(&mut tx, file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        if !file.is_deleted {
            return Ok(file);
        }

        let target = match file.previous_folder_id {
            Some(prev) => match self.folders.find_for_update(&mut tx, prev).await? {
                Some(parent) if !parent.is_deleted => prev,
                _ => ROOT_FOLDER_ID,
            },
            None => ROOT_FOLDER_ID,
        };
        let restored = self
            .files
            .restore_to(&mut tx, file_id, target)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        tx.commit().await.map_err(commit_error)?;

        info!(
            tenant = %ctx.tenant,
            file_id = %file_id,
            target_folder_id = %target,
            "File restored"
        );
        Ok(restored)
    }

    /// Copy a file in place.
    ///
    /// The copy is named `copy_<name>`, shares the original's content (the
    /// reference count goes up by one), and mirrors the original's
    /// lifecycle state.
    pub async fn copy_file(&self, ctx: &TenantContext, file_id: Uuid) -> AppResult<File> {
        let mut tx = self.pool.begin().await.map_err(begin_error)?;
        let original = self
            .files
            .find_for_update(&mut tx, file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.contents.retain(&mut tx, original.content_id).await?;
        let name = format!("copy_{}", original.name);
        let copy = self
            .files
            .create_copy_of(&mut tx, &original, original.folder_id, &name)
            .await?;
        tx.commit().await.map_err(commit_error)?;

        info!(
            tenant = %ctx.tenant,
            source_id = %file_id,
            copy_id = %copy.id,
            "File copied"
        );
        Ok(copy)
    }
}
