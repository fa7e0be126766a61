//! File repository: per-folder listings and lifecycle mutation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use drivebox_core::result::AppResult;
use drivebox_core::types::ListScope;
use drivebox_entity::file::{CreateFile, File, FileEntry};
use drivebox_entity::folder::sentinel::BIN_FOLDER_ID;

use super::{db_error, escape_like};

/// Repository for file CRUD and query operations.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find file"))
    }

    /// Find a file by ID inside a transaction, locking the row.
    pub async fn find_for_update(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to lock file"))
    }

    /// List files in a folder matching the scope, joined with their
    /// content metadata.
    pub async fn list_by_folder(
        &self,
        folder_id: Uuid,
        scope: ListScope,
    ) -> AppResult<Vec<FileEntry>> {
        sqlx::query_as::<_, FileEntry>(
            "SELECT fi.*, c.locator, c.size_bytes, c.mime_type \
             FROM files fi INNER JOIN contents c ON c.id = fi.content_id \
             WHERE fi.folder_id = $1 AND fi.is_deleted = $2 \
             ORDER BY fi.name ASC",
        )
        .bind(folder_id)
        .bind(scope.is_deleted())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list files"))
    }

    /// Case-insensitive prefix search on file display names.
    pub async fn search(
        &self,
        prefix: &str,
        scope: ListScope,
        folder_id: Option<Uuid>,
    ) -> AppResult<Vec<FileEntry>> {
        let pattern = format!("{}%", escape_like(prefix));
        sqlx::query_as::<_, FileEntry>(
            "SELECT fi.*, c.locator, c.size_bytes, c.mime_type \
             FROM files fi INNER JOIN contents c ON c.id = fi.content_id \
             WHERE fi.is_deleted = $2 AND fi.name ILIKE $1 \
               AND ($3::uuid IS NULL OR fi.folder_id = $3) \
             ORDER BY fi.name ASC",
        )
        .bind(pattern)
        .bind(scope.is_deleted())
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to search files"))
    }

    /// Create a new file record.
    pub async fn create(&self, conn: &mut PgConnection, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (folder_id, content_id, name) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.folder_id)
        .bind(data.content_id)
        .bind(&data.name)
        .fetch_one(conn)
        .await
        .map_err(db_error("Failed to create file"))
    }

    /// Create a copy of an existing file row, preserving its lifecycle
    /// state and pointing at the same content.
    pub async fn create_copy_of(
        &self,
        conn: &mut PgConnection,
        original: &File,
        folder_id: Uuid,
        name: &str,
    ) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (folder_id, previous_folder_id, content_id, name, is_deleted) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(folder_id)
        .bind(original.previous_folder_id)
        .bind(original.content_id)
        .bind(name)
        .bind(original.is_deleted)
        .fetch_one(conn)
        .await
        .map_err(db_error("Failed to copy file"))
    }

    /// Rename a file.
    pub async fn rename(&self, file_id: Uuid, new_name: &str) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(file_id)
        .bind(new_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to rename file"))
    }

    /// Move a file to a different folder.
    pub async fn update_parent(
        &self,
        conn: &mut PgConnection,
        file_id: Uuid,
        new_folder_id: Uuid,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET folder_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(file_id)
        .bind(new_folder_id)
        .fetch_optional(conn)
        .await
        .map_err(db_error("Failed to move file"))
    }

    /// Move a file into the bin: remember its folder, re-point it at the
    /// bin, and mark it deleted.
    pub async fn stash_to_bin(
        &self,
        conn: &mut PgConnection,
        file_id: Uuid,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET previous_folder_id = folder_id, folder_id = $2, \
             is_deleted = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(file_id)
        .bind(BIN_FOLDER_ID)
        .fetch_optional(conn)
        .await
        .map_err(db_error("Failed to move file to bin"))
    }

    /// Restore a file to the given folder, clearing the trash bookkeeping.
    pub async fn restore_to(
        &self,
        conn: &mut PgConnection,
        file_id: Uuid,
        folder_id: Uuid,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET folder_id = $2, previous_folder_id = NULL, \
             is_deleted = FALSE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(file_id)
        .bind(folder_id)
        .fetch_optional(conn)
        .await
        .map_err(db_error("Failed to restore file"))
    }

    /// Set the soft-delete flag on every file parented in the given folders.
    pub async fn set_deleted_by_folders(
        &self,
        conn: &mut PgConnection,
        folder_ids: &[Uuid],
        deleted: bool,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE files SET is_deleted = $2, updated_at = NOW() WHERE folder_id = ANY($1)",
        )
        .bind(folder_ids)
        .bind(deleted)
        .execute(conn)
        .await
        .map_err(db_error("Failed to update file soft-delete flags"))?;
        Ok(result.rows_affected())
    }

    /// Every file parented in the given folders, locked for the caller's
    /// transaction.
    ///
    /// Purge and copy both mutate (or retain against) every row collected
    /// here, so the rows are taken `FOR UPDATE`.
    pub async fn find_by_folders(
        &self,
        conn: &mut PgConnection,
        folder_ids: &[Uuid],
    ) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE folder_id = ANY($1) FOR UPDATE")
            .bind(folder_ids)
            .fetch_all(conn)
            .await
            .map_err(db_error("Failed to list files by folder set"))
    }

    /// Every trashed file tenant-wide, locked for the caller's transaction.
    pub async fn find_trashed(&self, conn: &mut PgConnection) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE is_deleted = TRUE ORDER BY updated_at DESC FOR UPDATE",
        )
        .fetch_all(conn)
        .await
        .map_err(db_error("Failed to list trashed files"))
    }

    /// Permanently delete a file row.
    pub async fn delete(&self, conn: &mut PgConnection, file_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(file_id)
            .execute(conn)
            .await
            .map_err(db_error("Failed to delete file"))?;
        Ok(result.rows_affected() > 0)
    }
}
