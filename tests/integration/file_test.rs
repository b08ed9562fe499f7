//! Upload allow-list, batch uploads, previews, and downloads.

use std::sync::Arc;

use bytes::Bytes;

use studyhub_core::error::ErrorKind;
use studyhub_service::{HandlePurpose, UploadFileRequest};
use studyhub_view::{NotificationLevel, View};

use crate::helpers::{TestApp, pdf, scratch_dir};

#[tokio::test]
async fn test_text_upload_is_rejected_with_one_error() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;
    let errors_before = app.hub.notifications().error_count();

    let err = app
        .hub
        .upload_file(
            seeded.lesson,
            Bytes::from_static(b"just text"),
            "notes.txt",
            "text/plain",
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::UnsupportedContentType);
    assert_eq!(app.hub.snapshot().file_count(seeded.lesson), 1);
    assert_eq!(app.count_rows("files").await, 1);
    assert_eq!(app.hub.notifications().error_count(), errors_before + 1);
}

#[tokio::test]
async fn test_batch_upload_reports_each_rejection() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;
    let before = app.broadcasts();

    let request = |name: &str, mime: &str| UploadFileRequest {
        lesson_id: seeded.lesson,
        name: name.to_string(),
        mime_type: mime.to_string(),
        data: pdf(),
    };
    let report = app
        .hub
        .upload_files(vec![
            request("a.pdf", "application/pdf"),
            request("b.txt", "text/plain"),
            request("c.png", "image/png"),
            request(
                "d.docx",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ),
        ])
        .await
        .unwrap();

    assert_eq!(report.uploaded.len(), 2);
    assert_eq!(report.rejected.len(), 2);
    assert_eq!(app.hub.notifications().error_count(), 2);
    assert_eq!(app.hub.snapshot().file_count(seeded.lesson), 3);
    assert_eq!(app.broadcasts(), before + 1);
}

#[tokio::test]
async fn test_upload_path_uses_reader() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;
    let dir = scratch_dir("upload");
    let doc = dir.join("Vocabulario.docx");
    std::fs::write(&doc, b"PK\x03\x04").unwrap();
    let txt = dir.join("notes.txt");
    std::fs::write(&txt, b"plain").unwrap();

    let file = app.hub.upload_path(seeded.lesson, &doc).await.unwrap();
    assert_eq!(file.name, "Vocabulario.docx");
    assert_eq!(file.size_bytes, 4);

    let err = app.hub.upload_path(seeded.lesson, &txt).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedContentType);

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn test_preview_then_delete_clears_preview_and_handle() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;
    app.hub.navigate_lesson(seeded.lesson).unwrap();

    let handle = app.hub.preview_file(seeded.file).await.unwrap();
    assert_eq!(handle.purpose, HandlePurpose::Preview);
    assert_eq!(handle.data, pdf());
    assert_eq!(app.hub.state().preview_file_id(), Some(seeded.file));
    match app.hub.current_view() {
        View::Lesson(view) => assert_eq!(view.preview.map(|f| f.id), Some(seeded.file)),
        other => panic!("expected lesson view, got {:?}", other.kind()),
    }

    app.hub.delete_file(seeded.file).await.unwrap();

    assert_eq!(app.hub.state().preview_file_id(), None);
    assert_eq!(app.hub.state().current_lesson_id(), Some(seeded.lesson));
    assert!(app.hub.active_handle().is_none());
    assert_eq!(app.hub.handles().issued(), app.hub.handles().released());
}

#[tokio::test]
async fn test_leaving_lesson_releases_preview() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;
    app.hub.navigate_lesson(seeded.lesson).unwrap();
    app.hub.preview_file(seeded.file).await.unwrap();

    app.hub.navigate_folder(seeded.folder).unwrap();

    assert!(app.hub.active_handle().is_none());
    assert_eq!(app.hub.handles().released(), 1);
}

#[tokio::test]
async fn test_preview_requires_open_lesson() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;

    let err = app.hub.preview_file(seeded.file).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(app.hub.active_handle().is_none());
    assert_eq!(app.hub.handles().issued(), 0);
}

#[tokio::test]
async fn test_download_writes_and_releases() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;
    let dir = scratch_dir("download");

    let path = app.hub.download_file(seeded.file, &dir).await.unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), pdf().to_vec());
    assert!(app.hub.active_handle().is_none());
    assert_eq!(app.hub.handles().issued(), 1);
    assert_eq!(app.hub.handles().released(), 1);
    let last = app.hub.notifications().active().pop().unwrap();
    assert_eq!(last.level, NotificationLevel::Success);

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn test_download_of_other_file_closes_preview() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;
    let other = app
        .hub
        .upload_file(seeded.lesson, pdf(), "other.pdf", "application/pdf")
        .await
        .unwrap();
    app.hub.navigate_lesson(seeded.lesson).unwrap();
    let preview = app.hub.preview_file(seeded.file).await.unwrap();
    let dir = scratch_dir("download-other");

    app.hub.download_file(other.id, &dir).await.unwrap();

    assert_eq!(app.hub.state().preview_file_id(), None);
    assert!(app.hub.active_handle().is_none());
    assert_eq!(app.hub.handles().issued(), 2);
    assert_eq!(app.hub.handles().released(), 2);
    assert_eq!(Arc::strong_count(&preview), 1);

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn test_download_of_previewed_file_keeps_preview() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;
    app.hub.navigate_lesson(seeded.lesson).unwrap();
    let preview = app.hub.preview_file(seeded.file).await.unwrap();
    let dir = scratch_dir("download-same");

    app.hub.download_file(seeded.file, &dir).await.unwrap();

    assert_eq!(app.hub.active_handle().map(|h| h.id), Some(preview.id));
    assert_eq!(app.hub.handles().issued(), 1);

    std::fs::remove_dir_all(dir).unwrap();
}
