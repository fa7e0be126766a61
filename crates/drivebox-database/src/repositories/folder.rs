//! Folder repository: tree queries and structural mutation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use drivebox_core::result::AppResult;
use drivebox_core::types::ListScope;
use drivebox_entity::folder::sentinel::BIN_FOLDER_ID;
use drivebox_entity::folder::{CreateFolder, Folder, FolderEntry};

use super::{db_error, escape_like};

/// Repository for folder CRUD and recursive tree queries.
///
/// Read-only listing queries run against the pool; everything that takes a
/// `&mut PgConnection` is meant to run inside the caller's transaction.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find folder"))
    }

    /// Find a folder by ID inside a transaction, locking the row.
    ///
    /// Structural mutations lock the subtree root first so concurrent
    /// delete/restore/copy/move on the same node serialize.
    pub async fn find_for_update(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to lock folder"))
    }

    /// List direct children of a folder in the given scope, each annotated
    /// with a live count of its own entries.
    ///
    /// The count follows the listing convention: subfolders regardless of
    /// scope, files filtered by the scope flag.
    pub async fn children_with_counts(
        &self,
        parent_id: Uuid,
        scope: ListScope,
    ) -> AppResult<Vec<FolderEntry>> {
        sqlx::query_as::<_, FolderEntry>(
            "SELECT f.*, \
                (SELECT COUNT(*) FROM folders c WHERE c.parent_id = f.id) \
                + (SELECT COUNT(*) FROM files fi WHERE fi.folder_id = f.id AND fi.is_deleted = $2) \
                AS entry_count \
             FROM folders f \
             WHERE f.parent_id = $1 AND f.is_deleted = $2 \
             ORDER BY f.name ASC",
        )
        .bind(parent_id)
        .bind(scope.is_deleted())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list child folders"))
    }

    /// Case-insensitive prefix search on folder names.
    pub async fn search(
        &self,
        prefix: &str,
        scope: ListScope,
        parent_id: Option<Uuid>,
    ) -> AppResult<Vec<FolderEntry>> {
        let pattern = format!("{}%", escape_like(prefix));
        sqlx::query_as::<_, FolderEntry>(
            "SELECT f.*, \
                (SELECT COUNT(*) FROM folders c WHERE c.parent_id = f.id) \
                + (SELECT COUNT(*) FROM files fi WHERE fi.folder_id = f.id AND fi.is_deleted = $2) \
                AS entry_count \
             FROM folders f \
             WHERE f.is_deleted = $2 AND f.name ILIKE $1 \
               AND ($3::uuid IS NULL OR f.parent_id = $3) \
             ORDER BY f.name ASC",
        )
        .bind(pattern)
        .bind(scope.is_deleted())
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to search folders"))
    }

    /// Create a new folder under an existing parent.
    pub async fn create(&self, conn: &mut PgConnection, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (name, parent_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.name)
        .bind(data.parent_id)
        .fetch_one(conn)
        .await
        .map_err(db_error("Failed to create folder"))
    }

    /// Insert a folder row with a caller-chosen ID, as produced by the
    /// subtree copy remapping. Copies start out active with no trash
    /// bookkeeping.
    pub async fn insert_copy(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, name, parent_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(parent_id)
        .fetch_one(conn)
        .await
        .map_err(db_error("Failed to insert folder copy"))
    }

    /// Rename a folder.
    pub async fn rename(&self, folder_id: Uuid, new_name: &str) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(folder_id)
        .bind(new_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to rename folder"))
    }

    /// Re-point a folder's parent edge. Does not touch soft-delete flags.
    pub async fn update_parent(
        &self,
        conn: &mut PgConnection,
        folder_id: Uuid,
        new_parent_id: Uuid,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(folder_id)
        .bind(new_parent_id)
        .fetch_optional(conn)
        .await
        .map_err(db_error("Failed to move folder"))
    }

    /// The ancestor chain of a folder, from the folder itself up to a
    /// sentinel. Includes the starting folder.
    ///
    /// Uses `UNION` (not `UNION ALL`) so the query terminates even if a
    /// cycle slipped into the graph.
    pub async fn ancestor_ids(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "WITH RECURSIVE ancestors AS ( \
                SELECT id, parent_id FROM folders WHERE id = $1 \
                UNION \
                SELECT f.id, f.parent_id FROM folders f \
                INNER JOIN ancestors a ON f.id = a.parent_id \
             ) SELECT id FROM ancestors",
        )
        .bind(id)
        .fetch_all(conn)
        .await
        .map_err(db_error("Failed to resolve ancestors"))
    }

    /// The transitive closure of descendant folder IDs beneath a root,
    /// excluding the root itself.
    pub async fn descendant_ids(
        &self,
        conn: &mut PgConnection,
        root_id: Uuid,
    ) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "WITH RECURSIVE tree AS ( \
                SELECT id FROM folders WHERE id = $1 \
                UNION \
                SELECT f.id FROM folders f INNER JOIN tree t ON f.parent_id = t.id \
             ) SELECT id FROM tree WHERE id != $1",
        )
        .bind(root_id)
        .fetch_all(conn)
        .await
        .map_err(db_error("Failed to resolve subtree"))
    }

    /// Fetch a full subtree (root included) as folder rows, shallowest
    /// first so the rows can be re-inserted in FK-safe order.
    pub async fn fetch_subtree(
        &self,
        conn: &mut PgConnection,
        root_id: Uuid,
    ) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "WITH RECURSIVE tree AS ( \
                SELECT f.*, 0 AS depth FROM folders f WHERE f.id = $1 \
                UNION ALL \
                SELECT f.*, t.depth + 1 FROM folders f \
                INNER JOIN tree t ON f.parent_id = t.id \
             ) SELECT id, name, parent_id, previous_parent_id, is_deleted, \
                      created_at, updated_at \
               FROM tree ORDER BY depth ASC, name ASC",
        )
        .bind(root_id)
        .fetch_all(conn)
        .await
        .map_err(db_error("Failed to fetch subtree"))
    }

    /// Set the soft-delete flag on a set of folders.
    pub async fn set_deleted(
        &self,
        conn: &mut PgConnection,
        ids: &[Uuid],
        deleted: bool,
    ) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE folders SET is_deleted = $2, updated_at = NOW() WHERE id = ANY($1)")
                .bind(ids)
                .bind(deleted)
                .execute(conn)
                .await
                .map_err(db_error("Failed to update soft-delete flags"))?;
        Ok(result.rows_affected())
    }

    /// Move a folder into the bin, remembering its prior parent.
    pub async fn stash_to_bin(
        &self,
        conn: &mut PgConnection,
        folder_id: Uuid,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET previous_parent_id = parent_id, parent_id = $2, \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(folder_id)
        .bind(BIN_FOLDER_ID)
        .fetch_optional(conn)
        .await
        .map_err(db_error("Failed to move folder to bin"))
    }

    /// Restore a folder to the given parent, clearing the trash bookkeeping.
    pub async fn restore_to(
        &self,
        conn: &mut PgConnection,
        folder_id: Uuid,
        parent_id: Uuid,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_id = $2, previous_parent_id = NULL, \
             is_deleted = FALSE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(folder_id)
        .bind(parent_id)
        .fetch_optional(conn)
        .await
        .map_err(db_error("Failed to restore folder"))
    }

    /// Direct child folders of a parent, locked for the caller's
    /// transaction.
    ///
    /// Bulk operations mutate every row they collect here, so the rows are
    /// taken `FOR UPDATE` to serialize against concurrent single-node
    /// delete/restore on the same folders.
    pub async fn children_of(
        &self,
        conn: &mut PgConnection,
        parent_id: Uuid,
    ) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE parent_id = $1 ORDER BY name ASC FOR UPDATE",
        )
        .bind(parent_id)
        .fetch_all(conn)
        .await
        .map_err(db_error("Failed to list child folders"))
    }

    /// Every trashed folder tenant-wide, excluding the bin sentinel itself,
    /// locked for the caller's transaction. Most recently trashed first.
    pub async fn find_trashed(&self, conn: &mut PgConnection) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE is_deleted = TRUE AND id != $1 \
             ORDER BY updated_at DESC FOR UPDATE",
        )
        .bind(BIN_FOLDER_ID)
        .fetch_all(conn)
        .await
        .map_err(db_error("Failed to list trashed folders"))
    }

    /// Permanently delete a set of folder rows.
    pub async fn delete_many(&self, conn: &mut PgConnection, ids: &[Uuid]) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM folders WHERE id = ANY($1)")
            .bind(ids)
            .execute(conn)
            .await
            .map_err(db_error("Failed to delete folders"))?;
        Ok(result.rows_affected())
    }
}
