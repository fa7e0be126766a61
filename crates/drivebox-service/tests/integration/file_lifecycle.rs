//! Upload, download, rename, move, copy, and the file delete branches.

use bytes::Bytes;

use drivebox_core::error::ErrorKind;
use drivebox_entity::folder::{BIN_FOLDER_ID, ROOT_FOLDER_ID};
use drivebox_service::file::UploadRequest;
use drivebox_service::trash::DeleteOutcome;

use crate::helpers;

#[tokio::test]
async fn upload_download_round_trip() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let entry = h.upload(ROOT_FOLDER_ID, "notes.txt", b"remember the milk").await;
    assert_eq!(entry.size_bytes, 17);
    assert_eq!(entry.mime_type, "text/plain");
    assert!(h.blobs.len() == 1);

    let (fetched, data) = h
        .files
        .download(&h.ctx, entry.file.id)
        .await
        .expect("download");
    assert_eq!(fetched.locator, entry.locator);
    assert_eq!(&data[..], b"remember the milk");
}

#[tokio::test]
async fn upload_into_missing_folder_leaves_no_blob() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let err = h
        .files
        .upload(
            &h.ctx,
            UploadRequest {
                folder_id: uuid::Uuid::new_v4(),
                name: "lost.txt".to_string(),
                mime_type: "text/plain".to_string(),
                data: Bytes::from_static(b"nowhere"),
            },
        )
        .await
        .expect_err("folder does not exist");
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(h.blobs.is_empty());
}

#[tokio::test]
async fn delete_trashes_then_purges_then_vanishes() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let entry = h.upload(ROOT_FOLDER_ID, "draft.txt", b"wip").await;

    let outcome = h
        .files
        .delete_file(&h.ctx, entry.file.id)
        .await
        .expect("first delete");
    assert_eq!(outcome, DeleteOutcome::Trashed);

    let trashed = h.file(entry.file.id).await;
    assert!(trashed.is_deleted);
    assert_eq!(trashed.folder_id, BIN_FOLDER_ID);
    assert_eq!(trashed.previous_folder_id, Some(ROOT_FOLDER_ID));

    let outcome = h
        .files
        .delete_file(&h.ctx, entry.file.id)
        .await
        .expect("second delete");
    assert_eq!(outcome, DeleteOutcome::Purged);
    assert!(h.blobs.is_empty());

    let err = h
        .files
        .delete_file(&h.ctx, entry.file.id)
        .await
        .expect_err("third delete");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn copies_share_content_until_last_purge() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let original = h.upload(ROOT_FOLDER_ID, "song.mp3", b"audio").await;
    let copy1 = h
        .files
        .copy_file(&h.ctx, original.file.id)
        .await
        .expect("first copy");
    assert_eq!(copy1.name, "copy_song.mp3");
    assert_eq!(copy1.content_id, original.file.content_id);
    let copy2 = h
        .files
        .copy_file(&h.ctx, original.file.id)
        .await
        .expect("second copy");

    let content = h
        .content_repo
        .find_by_id(original.file.content_id)
        .await
        .expect("query content")
        .expect("content exists");
    assert_eq!(content.copy_count, 2);
    assert_eq!(content.reference_count(), 3);
    assert_eq!(h.blobs.len(), 1);

    // Purge two of the three references: the blob survives.
    for id in [copy1.id, copy2.id] {
        h.files.delete_file(&h.ctx, id).await.expect("trash");
        h.files.delete_file(&h.ctx, id).await.expect("purge");
    }
    assert_eq!(h.blobs.len(), 1);

    // Purging the last reference erases blob and record.
    h.files
        .delete_file(&h.ctx, original.file.id)
        .await
        .expect("trash original");
    h.files
        .delete_file(&h.ctx, original.file.id)
        .await
        .expect("purge original");
    assert!(h.blobs.is_empty());
    assert!(
        h.content_repo
            .find_by_id(original.file.content_id)
            .await
            .expect("query content")
            .is_none()
    );
}

#[tokio::test]
async fn restore_prefers_previous_folder_and_falls_back_to_root() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let home = h.mkdir(ROOT_FOLDER_ID, "home").await;
    let entry = h.upload(home.id, "cv.pdf", b"pdf").await;

    h.files
        .delete_file(&h.ctx, entry.file.id)
        .await
        .expect("trash file");
    let restored = h
        .files
        .restore_file(&h.ctx, entry.file.id)
        .await
        .expect("restore");
    assert_eq!(restored.folder_id, home.id);
    assert!(!restored.is_deleted);
    assert_eq!(restored.previous_folder_id, None);

    // Trash it again, then purge its home folder out from under it.
    h.files
        .delete_file(&h.ctx, entry.file.id)
        .await
        .expect("trash again");
    h.folders.delete_folder(&h.ctx, home.id).await.expect("trash home");
    h.folders.delete_folder(&h.ctx, home.id).await.expect("purge home");

    let restored = h
        .files
        .restore_file(&h.ctx, entry.file.id)
        .await
        .expect("restore without home");
    assert_eq!(restored.folder_id, ROOT_FOLDER_ID);

    // Restoring an active file changes nothing.
    let again = h
        .files
        .restore_file(&h.ctx, entry.file.id)
        .await
        .expect("restore active");
    assert_eq!(again.folder_id, ROOT_FOLDER_ID);
}

#[tokio::test]
async fn move_file_requires_active_target() {
    let Some(h) = helpers::harness().await else {
        return;
    };

    let inbox = h.mkdir(ROOT_FOLDER_ID, "inbox").await;
    let archive = h.mkdir(ROOT_FOLDER_ID, "archive").await;
    let entry = h.upload(inbox.id, "memo.txt", b"memo").await;

    let moved = h
        .files
        .move_file(&h.ctx, entry.file.id, archive.id)
        .await
        .expect("move");
    assert_eq!(moved.folder_id, archive.id);

    h.folders.delete_folder(&h.ctx, inbox.id).await.expect("trash inbox");
    let err = h
        .files
        .move_file(&h.ctx, entry.file.id, inbox.id)
        .await
        .expect_err("trashed target");
    assert_eq!(err.kind, ErrorKind::NotFound);
}
