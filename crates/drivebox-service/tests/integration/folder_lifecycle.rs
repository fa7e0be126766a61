//! Folder creation, listing, rename, move, copy, and search.

use drivebox_core::error::ErrorKind;
use drivebox_core::types::ListScope;
use drivebox_entity::folder::{BIN_FOLDER_ID, ROOT_FOLDER_ID};
use drivebox_entity::listing::Entry;

use crate::helpers;

#[tokio::test]
async fn listing_shows_folders_then_files_with_counts() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let docs = h.mkdir(ROOT_FOLDER_ID, "docs").await;
    h.mkdir(docs.id, "inner").await;
    h.upload(docs.id, "a.txt", b"aaa").await;
    h.upload(docs.id, "b.txt", b"bbb").await;
    h.upload(ROOT_FOLDER_ID, "readme.txt", b"hello").await;

    let listing = h
        .folders
        .list_folder(&h.ctx, ROOT_FOLDER_ID, ListScope::Active)
        .await
        .expect("list root");

    assert_eq!(listing.current_folder.id, ROOT_FOLDER_ID);
    assert_eq!(listing.entries.len(), 2);
    match &listing.entries[0] {
        Entry::Folder(f) => {
            assert_eq!(f.folder.name, "docs");
            // one subfolder plus two active files
            assert_eq!(f.entry_count, 3);
        }
        other => panic!("expected folder first, got {other:?}"),
    }
    match &listing.entries[1] {
        Entry::File(f) => assert_eq!(f.file.name, "readme.txt"),
        other => panic!("expected file second, got {other:?}"),
    }
}

#[tokio::test]
async fn create_rejects_missing_or_trashed_parent() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let err = h
        .folders
        .create_folder(
            &h.ctx,
            drivebox_entity::folder::CreateFolder {
                name: "orphan".to_string(),
                parent_id: uuid::Uuid::new_v4(),
            },
        )
        .await
        .expect_err("parent does not exist");
    assert_eq!(err.kind, ErrorKind::NotFound);

    let doomed = h.mkdir(ROOT_FOLDER_ID, "doomed").await;
    h.folders
        .delete_folder(&h.ctx, doomed.id)
        .await
        .expect("trash folder");
    let err = h
        .folders
        .create_folder(
            &h.ctx,
            drivebox_entity::folder::CreateFolder {
                name: "child".to_string(),
                parent_id: doomed.id,
            },
        )
        .await
        .expect_err("parent is trashed");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn rename_and_sentinel_guards() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let folder = h.mkdir(ROOT_FOLDER_ID, "before").await;
    let renamed = h
        .folders
        .rename_folder(&h.ctx, folder.id, "after")
        .await
        .expect("rename");
    assert_eq!(renamed.name, "after");

    let err = h
        .folders
        .rename_folder(&h.ctx, folder.id, "")
        .await
        .expect_err("empty name");
    assert_eq!(err.kind, ErrorKind::Validation);

    for sentinel in [ROOT_FOLDER_ID, BIN_FOLDER_ID] {
        let err = h
            .folders
            .rename_folder(&h.ctx, sentinel, "x")
            .await
            .expect_err("sentinel rename");
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = h
            .folders
            .delete_folder(&h.ctx, sentinel)
            .await
            .expect_err("sentinel delete");
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}

#[tokio::test]
async fn move_rejects_cycles() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let a = h.mkdir(ROOT_FOLDER_ID, "a").await;
    let b = h.mkdir(a.id, "b").await;
    let c = h.mkdir(b.id, "c").await;

    let err = h
        .folders
        .move_folder(&h.ctx, a.id, c.id)
        .await
        .expect_err("move into own subtree");
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = h
        .folders
        .move_folder(&h.ctx, a.id, a.id)
        .await
        .expect_err("move into itself");
    assert_eq!(err.kind, ErrorKind::Validation);

    // A legal sideways move still works.
    let d = h.mkdir(ROOT_FOLDER_ID, "d").await;
    let moved = h
        .folders
        .move_folder(&h.ctx, c.id, d.id)
        .await
        .expect("legal move");
    assert_eq!(moved.parent_id, Some(d.id));
}

#[tokio::test]
async fn copy_folder_shares_content() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let photos = h.mkdir(ROOT_FOLDER_ID, "photos").await;
    let trips = h.mkdir(photos.id, "trips").await;
    let original = h.upload(trips.id, "beach.jpg", b"jpegbytes").await;
    let blobs_before = h.blobs.len();

    let copy_root = h
        .folders
        .copy_folder(&h.ctx, photos.id)
        .await
        .expect("copy folder");
    assert_eq!(copy_root.name, "copy_photos");
    assert_eq!(copy_root.parent_id, Some(ROOT_FOLDER_ID));
    assert!(!copy_root.is_deleted);

    // The subtree came along, names unchanged below the root.
    let listing = h
        .folders
        .list_folder(&h.ctx, copy_root.id, ListScope::Active)
        .await
        .expect("list copy");
    assert_eq!(listing.entries.len(), 1);
    assert_eq!(listing.entries[0].name(), "trips");

    // Content is shared: refcount went up, no new blob was written.
    let content = h
        .content_repo
        .find_by_id(original.file.content_id)
        .await
        .expect("query content")
        .expect("content exists");
    assert_eq!(content.copy_count, 1);
    assert_eq!(h.blobs.len(), blobs_before);
}

#[tokio::test]
async fn search_scopes_to_folder_unless_global() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let docs = h.mkdir(ROOT_FOLDER_ID, "docs").await;
    h.mkdir(docs.id, "reports").await;
    h.upload(docs.id, "report-2026.txt", b"q2").await;
    h.upload(ROOT_FOLDER_ID, "report-root.txt", b"q1").await;

    let scoped = h
        .folders
        .search_entries(&h.ctx, docs.id, "report", ListScope::Active, false)
        .await
        .expect("scoped search");
    assert_eq!(scoped.entries.len(), 2);

    let global = h
        .folders
        .search_entries(&h.ctx, docs.id, "report", ListScope::Active, true)
        .await
        .expect("global search");
    assert_eq!(global.entries.len(), 3);

    // LIKE metacharacters in the query are literal.
    let literal = h
        .folders
        .search_entries(&h.ctx, docs.id, "%", ListScope::Active, true)
        .await
        .expect("literal search");
    assert!(literal.entries.is_empty());
}
