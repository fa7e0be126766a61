//! Idempotent bootstrapping of the two sentinel folders.

use sqlx::PgPool;
use tracing::{debug, info};

use drivebox_core::result::AppResult;
use drivebox_entity::folder::sentinel::{
    BIN_FOLDER_ID, BIN_FOLDER_NAME, ROOT_FOLDER_ID, ROOT_FOLDER_NAME,
};

use crate::repositories::db_error;

/// Ensure the `root` and `bin` sentinel folders exist for this tenant.
///
/// Safe to call from concurrent requests: a sentinel that already exists
/// (including one inserted by a racing request) is treated as success.
pub async fn ensure_sentinels(pool: &PgPool) -> AppResult<()> {
    let sentinels = [
        (ROOT_FOLDER_ID, ROOT_FOLDER_NAME, false),
        (BIN_FOLDER_ID, BIN_FOLDER_NAME, true),
    ];

    for (id, name, is_deleted) in sentinels {
        let result = sqlx::query(
            "INSERT INTO folders (id, name, parent_id, is_deleted) \
             VALUES ($1, $2, NULL, $3) ON CONFLICT (id) DO NOTHING",
        )
        .bind(id)
        .bind(name)
        .bind(is_deleted)
        .execute(pool)
        .await
        .map_err(db_error("Failed to create sentinel folder"))?;

        if result.rows_affected() > 0 {
            info!(folder = name, "Sentinel folder created");
        } else {
            debug!(folder = name, "Sentinel folder already present");
        }
    }

    Ok(())
}
