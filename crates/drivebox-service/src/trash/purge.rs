//! Shared purge helpers used by folder deletes and bin-wide purge.
//!
//! All metadata deletion happens inside the caller's transaction; blob
//! locators freed by the purge are collected and erased best-effort only
//! after that transaction has committed.

use sqlx::PgConnection;
use tracing::warn;
use uuid::Uuid;

use drivebox_core::result::AppResult;
use drivebox_core::traits::ObjectStore;
use drivebox_database::repositories::content::{ContentRepository, ReleaseOutcome};
use drivebox_database::repositories::file::FileRepository;
use drivebox_database::repositories::folder::FolderRepository;
use drivebox_entity::file::File;

/// Permanently delete one file row, releasing its content reference.
///
/// When the release finds the last reference, the freed blob locator is
/// pushed onto `blobs` for post-commit erasure.
pub(crate) async fn purge_file(
    conn: &mut PgConnection,
    files: &FileRepository,
    contents: &ContentRepository,
    file: &File,
    blobs: &mut Vec<String>,
) -> AppResult<()> {
    // The file row must go before the release: a last-reference release
    // deletes the content row, which the file still points at.
    files.delete(conn, file.id).await?;
    match contents.release(conn, file.content_id).await? {
        ReleaseOutcome::Purged { locator } => blobs.push(locator),
        ReleaseOutcome::Retained(_) => {}
    }
    Ok(())
}

/// Permanently delete a folder and its full subtree.
///
/// Files (and their content accounting) go first; folder rows are only
/// removed once no content purge is pending for them.
pub(crate) async fn purge_folder_subtree(
    conn: &mut PgConnection,
    folders: &FolderRepository,
    files: &FileRepository,
    contents: &ContentRepository,
    root_id: Uuid,
    blobs: &mut Vec<String>,
) -> AppResult<()> {
    let mut all = folders.descendant_ids(conn, root_id).await?;
    all.push(root_id);

    let victims = files.find_by_folders(conn, &all).await?;
    for file in &victims {
        purge_file(conn, files, contents, file, blobs).await?;
    }

    folders.delete_many(conn, &all).await?;
    Ok(())
}

/// Erase freed blobs after the owning transaction committed.
///
/// Failures are logged and swallowed: the metadata that justified the
/// deletion is already gone, so the worst case is a stray blob.
pub(crate) async fn delete_blobs_best_effort(store: &dyn ObjectStore, locators: Vec<String>) {
    for locator in locators {
        if let Err(e) = store.delete(&locator).await {
            warn!(locator = %locator, error = %e, "Failed to erase blob after purge");
        }
    }
}
