//! Cascade delete and orphan maintenance through the controller.

use studyhub_core::error::ErrorKind;
use studyhub_core::traits::Repository;
use studyhub_core::types::{FolderId, LessonId};
use studyhub_service::{AddLinkRequest, CreateTopicRequest, RenameFileRequest};
use studyhub_view::{Navigation, View, ViewKind};

use crate::helpers::{TestApp, pdf, scratch_dir};

#[tokio::test]
async fn test_delete_folder_removes_whole_branch() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;
    app.hub.navigate_lesson(seeded.lesson).unwrap();

    let report = app.hub.delete_folder(seeded.folder).await.unwrap();
    assert_eq!(
        (report.folders, report.topics, report.lessons, report.files),
        (1, 1, 1, 1)
    );
    assert_eq!(report.deleted_files, vec![seeded.file]);

    for table in ["folders", "topics", "lessons", "files"] {
        assert_eq!(app.count_rows(table).await, 0, "{table} not empty");
    }

    let snapshot = app.hub.snapshot();
    assert!(snapshot.folder(seeded.folder).is_none());
    assert!(snapshot.topic(seeded.topic).is_none());
    assert!(snapshot.lesson(seeded.lesson).is_none());
    assert!(snapshot.file(seeded.file).is_none());

    assert_eq!(app.hub.state(), Navigation::Dashboard);
    match app.hub.current_view() {
        View::Dashboard(dashboard) => assert!(dashboard.folders.is_empty()),
        other => panic!("expected dashboard, got {:?}", other.kind()),
    }
}

#[tokio::test]
async fn test_delete_keeps_sibling_branches() {
    let app = TestApp::new().await;
    let first = app.seed().await;
    let second = app.seed().await;

    app.hub.delete_topic(first.topic).await.unwrap();

    assert!(app.hub.snapshot().folder(first.folder).is_some());
    assert!(app.hub.snapshot().lesson(second.lesson).is_some());
    assert_eq!(app.count_rows("lessons").await, 1);
    assert_eq!(app.count_rows("files").await, 1);
}

#[tokio::test]
async fn test_delete_of_missing_record_is_already_gone() {
    let app = TestApp::new().await;
    let before = app.broadcasts();

    let report = app.hub.delete_lesson(LessonId(41)).await.unwrap();

    assert!(report.is_empty());
    assert_eq!(app.hub.notifications().error_count(), 0);
    assert_eq!(app.broadcasts(), before + 1);
}

#[tokio::test]
async fn test_purge_orphans() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;

    // A topic whose folder vanished, as left behind by an interrupted cascade.
    sqlx::query(
        "INSERT INTO topics (folder_id, name, created_at, sort_order) \
         VALUES (999, 'Stray', '2024-01-01T00:00:00Z', 0)",
    )
    .execute(app.hub.store().pool())
    .await
    .unwrap();
    app.hub.reload().await.unwrap();

    let snapshot = app.hub.snapshot();
    assert_eq!(snapshot.totals().topics, 1, "orphan must be hidden");
    assert!(
        snapshot
            .topics_in(FolderId(999))
            .is_empty()
    );

    let report = app.hub.purge_orphans().await.unwrap();
    assert_eq!(report.topics, 1);
    assert_eq!(app.count_rows("topics").await, 1);
    assert!(app.hub.snapshot().topic(seeded.topic).is_some());

    let again = app.hub.purge_orphans().await.unwrap();
    assert!(again.is_empty());
}

#[tokio::test]
async fn test_deleted_selection_falls_back_to_dashboard() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;
    app.hub.navigate_topic(seeded.topic).unwrap();

    app.hub.delete_folder(seeded.folder).await.unwrap();

    let seen = app.seen.lock().unwrap();
    assert_eq!(seen.last(), Some(&Navigation::Dashboard));
    assert_eq!(app.hub.current_view().kind(), ViewKind::Dashboard);
}

#[tokio::test]
async fn test_orphaned_branch_is_not_found() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;

    // Only the folder row goes; the rest of the branch is orphaned.
    assert!(app.hub.store().folders().delete(seeded.folder).await.unwrap());
    app.hub.reload().await.unwrap();
    assert!(app.hub.snapshot().lesson(seeded.lesson).is_none());
    let files_before = app.count_rows("files").await;
    let errors_before = app.hub.notifications().error_count();

    let err = app
        .hub
        .upload_file(seeded.lesson, pdf(), "notes.pdf", "application/pdf")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(app.count_rows("files").await, files_before);

    let err = app
        .hub
        .add_link(
            seeded.lesson,
            AddLinkRequest {
                title: "RAE".to_string(),
                url: "https://www.rae.es".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let dir = scratch_dir("orphan");
    let err = app.hub.download_file(seeded.file, &dir).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(app.hub.active_handle().is_none());

    let err = app
        .hub
        .rename_file(
            seeded.file,
            RenameFileRequest {
                name: "renamed.pdf".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    assert_eq!(app.hub.notifications().error_count(), errors_before + 4);
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_topic_order_stays_dense_after_delete() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;
    let create = |name: &str| CreateTopicRequest {
        folder_id: seeded.folder,
        name: name.to_string(),
    };

    let vocab = app.hub.create_topic(create("Vocabulary")).await.unwrap();
    app.hub.delete_topic(seeded.topic).await.unwrap();
    let verbs = app.hub.create_topic(create("Verbs")).await.unwrap();

    let snapshot = app.hub.snapshot();
    let orders: Vec<_> = snapshot
        .topics_in(seeded.folder)
        .into_iter()
        .map(|t| (t.id, t.order))
        .collect();
    assert_eq!(orders, vec![(vocab.id, Some(0)), (verbs.id, Some(1))]);
}
