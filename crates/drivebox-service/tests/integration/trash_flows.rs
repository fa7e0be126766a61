//! Folder trash round-trips, bin purge, and bulk restore.

use drivebox_core::error::ErrorKind;
use drivebox_core::types::ListScope;
use drivebox_entity::folder::{BIN_FOLDER_ID, ROOT_FOLDER_ID};
use drivebox_service::trash::DeleteOutcome;

use crate::helpers;

#[tokio::test]
async fn folder_delete_restore_round_trip() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let projects = h.mkdir(ROOT_FOLDER_ID, "projects").await;
    let alpha = h.mkdir(projects.id, "alpha").await;
    let notes = h.upload(alpha.id, "notes.txt", b"notes").await;

    let outcome = h
        .folders
        .delete_folder(&h.ctx, projects.id)
        .await
        .expect("trash subtree");
    assert_eq!(outcome, DeleteOutcome::Trashed);

    // Only the subtree root moved; descendants keep their edges but are
    // flagged, so the whole tree reads as trashed.
    let root_row = h.folder(projects.id).await;
    assert!(root_row.is_deleted);
    assert_eq!(root_row.parent_id, Some(BIN_FOLDER_ID));
    assert_eq!(root_row.previous_parent_id, Some(ROOT_FOLDER_ID));

    let alpha_row = h.folder(alpha.id).await;
    assert!(alpha_row.is_deleted);
    assert_eq!(alpha_row.parent_id, Some(projects.id));
    assert!(h.file(notes.file.id).await.is_deleted);

    // The bin view shows the trashed root.
    let bin = h
        .folders
        .list_folder(&h.ctx, BIN_FOLDER_ID, ListScope::Trashed)
        .await
        .expect("list bin");
    assert_eq!(bin.entries.len(), 1);
    assert_eq!(bin.entries[0].name(), "projects");

    let restored = h
        .folders
        .restore_folder(&h.ctx, projects.id)
        .await
        .expect("restore subtree");
    assert_eq!(restored.parent_id, Some(ROOT_FOLDER_ID));
    assert_eq!(restored.previous_parent_id, None);
    assert!(!restored.is_deleted);
    assert!(!h.folder(alpha.id).await.is_deleted);
    assert!(!h.file(notes.file.id).await.is_deleted);
}

#[tokio::test]
async fn restore_falls_back_to_root_when_previous_parent_gone() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let outer = h.mkdir(ROOT_FOLDER_ID, "outer").await;
    let inner = h.mkdir(outer.id, "inner").await;

    // Trash inner on its own, then purge outer entirely.
    h.folders.delete_folder(&h.ctx, inner.id).await.expect("trash inner");
    h.folders.delete_folder(&h.ctx, outer.id).await.expect("trash outer");
    h.folders.delete_folder(&h.ctx, outer.id).await.expect("purge outer");

    let restored = h
        .folders
        .restore_folder(&h.ctx, inner.id)
        .await
        .expect("restore inner");
    assert_eq!(restored.parent_id, Some(ROOT_FOLDER_ID));
}

#[tokio::test]
async fn second_folder_delete_purges_subtree_and_blobs() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let stuff = h.mkdir(ROOT_FOLDER_ID, "stuff").await;
    let nested = h.mkdir(stuff.id, "nested").await;
    h.upload(stuff.id, "a.bin", b"aa").await;
    h.upload(nested.id, "b.bin", b"bb").await;
    assert_eq!(h.blobs.len(), 2);

    h.folders.delete_folder(&h.ctx, stuff.id).await.expect("trash");
    let outcome = h
        .folders
        .delete_folder(&h.ctx, stuff.id)
        .await
        .expect("purge");
    assert_eq!(outcome, DeleteOutcome::Purged);

    assert!(h.blobs.is_empty());
    let err = h
        .folders
        .list_folder(&h.ctx, stuff.id, ListScope::Active)
        .await
        .expect_err("folder is gone");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn purge_bin_empties_everything() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let folder = h.mkdir(ROOT_FOLDER_ID, "old").await;
    h.upload(folder.id, "buried.txt", b"buried").await;
    let loose = h.upload(ROOT_FOLDER_ID, "loose.txt", b"loose").await;

    h.folders.delete_folder(&h.ctx, folder.id).await.expect("trash folder");
    h.files.delete_file(&h.ctx, loose.file.id).await.expect("trash file");

    h.trash.purge_bin(&h.ctx).await.expect("purge bin");

    assert!(h.blobs.is_empty());
    let bin = h
        .folders
        .list_folder(&h.ctx, BIN_FOLDER_ID, ListScope::Trashed)
        .await
        .expect("list bin");
    assert!(bin.entries.is_empty());

    // Survivors are untouched.
    let root = h
        .folders
        .list_folder(&h.ctx, ROOT_FOLDER_ID, ListScope::Active)
        .await
        .expect("list root");
    assert!(root.entries.is_empty());

    // Purging an empty bin is fine.
    h.trash.purge_bin(&h.ctx).await.expect("purge empty bin");
}

#[tokio::test]
async fn purge_bin_serializes_against_concurrent_restore() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let victim = h.mkdir(ROOT_FOLDER_ID, "victim").await;
    h.upload(victim.id, "data.txt", b"data").await;
    h.folders.delete_folder(&h.ctx, victim.id).await.expect("trash victim");

    let (purge, restore) = tokio::join!(
        h.trash.purge_bin(&h.ctx),
        h.folders.restore_folder(&h.ctx, victim.id),
    );
    purge.expect("purge bin");

    // The row locks force one winner. A restored folder stays active with
    // its file intact; a purged folder is gone along with its blob. A row
    // that was restored and then deleted anyway must never remain.
    match h
        .folder_repo
        .find_by_id(victim.id)
        .await
        .expect("query folder")
    {
        Some(row) => {
            restore.expect("restore won, so it must have succeeded");
            assert!(!row.is_deleted);
            assert_eq!(row.parent_id, Some(ROOT_FOLDER_ID));
            assert_eq!(h.blobs.len(), 1);
        }
        None => {
            let err = restore.expect_err("folder was purged first");
            assert_eq!(err.kind, ErrorKind::NotFound);
            assert!(h.blobs.is_empty());
        }
    }
}

#[tokio::test]
async fn restore_all_brings_every_node_back() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let keep = h.mkdir(ROOT_FOLDER_ID, "keep").await;
    let tossed = h.mkdir(ROOT_FOLDER_ID, "tossed").await;
    let nested = h.mkdir(tossed.id, "nested").await;
    let loose = h.upload(keep.id, "loose.txt", b"x").await;

    h.folders.delete_folder(&h.ctx, tossed.id).await.expect("trash folder");
    h.files.delete_file(&h.ctx, loose.file.id).await.expect("trash file");

    h.trash.restore_all(&h.ctx).await.expect("restore all");

    let tossed_row = h.folder(tossed.id).await;
    assert!(!tossed_row.is_deleted);
    assert_eq!(tossed_row.parent_id, Some(ROOT_FOLDER_ID));

    // The nested folder was never individually stashed; it stays where it
    // was instead of being flattened under root.
    let nested_row = h.folder(nested.id).await;
    assert!(!nested_row.is_deleted);
    assert_eq!(nested_row.parent_id, Some(tossed.id));

    let loose_row = h.file(loose.file.id).await;
    assert!(!loose_row.is_deleted);
    assert_eq!(loose_row.folder_id, keep.id);
}
