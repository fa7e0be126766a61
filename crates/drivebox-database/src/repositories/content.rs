//! Content repository: reference-count accounting for stored bytes.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_entity::content::{Content, CreateContent};

use super::db_error;

/// What happened to a content record when a reference was released.
#[derive(Debug, Clone)]
pub enum ReleaseOutcome {
    /// Another file still references the content; the count was decremented.
    Retained(Content),
    /// This was the last reference. The record is gone and the caller must
    /// erase the backing blob after its transaction commits.
    Purged {
        /// Locator of the blob to erase.
        locator: String,
    },
}

/// Repository for content records and their copy-reference counts.
///
/// Counts are only ever read or written inside the owning transaction, so
/// every method here takes a `&mut PgConnection` except the plain lookup.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    pool: PgPool,
}

impl ContentRepository {
    /// Create a new content repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a content record by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Content>> {
        sqlx::query_as::<_, Content>("SELECT * FROM contents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find content"))
    }

    /// Create a new content record with a copy count of zero.
    pub async fn create(&self, conn: &mut PgConnection, data: &CreateContent) -> AppResult<Content> {
        sqlx::query_as::<_, Content>(
            "INSERT INTO contents (locator, size_bytes, mime_type) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.locator)
        .bind(data.size_bytes)
        .bind(&data.mime_type)
        .fetch_one(conn)
        .await
        .map_err(db_error("Failed to create content"))
    }

    /// Increment the copy-reference count by one.
    pub async fn retain(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<Content> {
        sqlx::query_as::<_, Content>(
            "UPDATE contents SET copy_count = copy_count + 1 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(db_error("Failed to retain content"))?
        .ok_or_else(|| AppError::not_found(format!("Content {id} not found")))
    }

    /// Release one reference.
    ///
    /// Decrements when other copies remain; deletes the record and reports
    /// the blob locator when this was the last reference. The count never
    /// goes negative.
    pub async fn release(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<ReleaseOutcome> {
        let content =
            sqlx::query_as::<_, Content>("SELECT * FROM contents WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(db_error("Failed to lock content"))?
                .ok_or_else(|| AppError::not_found(format!("Content {id} not found")))?;

        if content.copy_count > 0 {
            let updated = sqlx::query_as::<_, Content>(
                "UPDATE contents SET copy_count = copy_count - 1 WHERE id = $1 RETURNING *",
            )
            .bind(id)
            .fetch_one(conn)
            .await
            .map_err(db_error("Failed to release content"))?;
            Ok(ReleaseOutcome::Retained(updated))
        } else {
            sqlx::query("DELETE FROM contents WHERE id = $1")
                .bind(id)
                .execute(conn)
                .await
                .map_err(db_error("Failed to delete content"))?;
            Ok(ReleaseOutcome::Purged {
                locator: content.locator,
            })
        }
    }
}
