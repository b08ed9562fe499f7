//! CRUD, ordering, and validation through the controller.

use studyhub_core::error::ErrorKind;
use studyhub_core::types::is_display_sorted;
use studyhub_service::{
    AddLinkRequest, CreateFolderRequest, CreateTopicRequest, UpdateFolderRequest,
    UpdateLessonRequest,
};
use studyhub_view::NotificationLevel;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_topics_get_consecutive_order() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;

    let second = app
        .hub
        .create_topic(CreateTopicRequest {
            folder_id: seeded.folder,
            name: "Vocabulary".to_string(),
        })
        .await
        .unwrap();

    let first = app.hub.snapshot().topic(seeded.topic).cloned().unwrap();
    assert_eq!(first.order, Some(0));
    assert_eq!(second.order, Some(1));
}

#[tokio::test]
async fn test_update_then_get_keeps_id() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;

    let updated = app
        .hub
        .update_folder(
            seeded.folder,
            UpdateFolderRequest {
                name: Some("Spanish".to_string()),
                color: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, seeded.folder);

    let snapshot = app.hub.snapshot();
    let folder = snapshot.folder(seeded.folder).unwrap();
    assert_eq!(folder.name, "Spanish");
    assert_eq!(folder.color, "#e63946");

    app.hub
        .update_lesson(
            seeded.lesson,
            UpdateLessonRequest {
                description: Some(None),
                ..UpdateLessonRequest::default()
            },
        )
        .await
        .unwrap();
    let lesson = app.hub.snapshot().lesson(seeded.lesson).cloned().unwrap();
    assert_eq!(lesson.id, seeded.lesson);
    assert_eq!(lesson.title, "Ser vs Estar");
    assert_eq!(lesson.description, None);
}

#[tokio::test]
async fn test_reorder_is_reflected_in_snapshot() {
    let app = TestApp::new().await;
    let mut ids = Vec::new();
    for name in ["A", "B", "C"] {
        let folder = app
            .hub
            .create_folder(CreateFolderRequest {
                name: name.to_string(),
                color: None,
            })
            .await
            .unwrap();
        ids.push(folder.id);
    }

    ids.reverse();
    app.hub.reorder_folders(&ids).await.unwrap();

    let snapshot = app.hub.snapshot();
    let names: Vec<&str> = snapshot.folders().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["C", "B", "A"]);
    assert!(is_display_sorted(snapshot.folders()));
}

#[tokio::test]
async fn test_invalid_input_pushes_one_error() {
    let app = TestApp::new().await;
    let before = app.broadcasts();

    let err = app
        .hub
        .create_folder(CreateFolderRequest {
            name: "   ".to_string(),
            color: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(app.hub.notifications().error_count(), 1);
    assert_eq!(app.broadcasts(), before, "failed mutation must not broadcast");
    assert!(app.hub.snapshot().folders().is_empty());
}

#[tokio::test]
async fn test_links_round_trip_through_cache() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;

    let link = app
        .hub
        .add_link(
            seeded.lesson,
            AddLinkRequest {
                title: "RAE dictionary".to_string(),
                url: "https://dle.rae.es".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        app.hub.snapshot().lesson(seeded.lesson).unwrap().links,
        vec![link.clone()]
    );

    let err = app
        .hub
        .add_link(
            seeded.lesson,
            AddLinkRequest {
                title: "Bad".to_string(),
                url: "javascript:alert(1)".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    assert!(app.hub.remove_link(seeded.lesson, link.id).await.unwrap());
    assert!(app.hub.snapshot().lesson(seeded.lesson).unwrap().links.is_empty());

    let levels: Vec<NotificationLevel> = app
        .hub
        .notifications()
        .active()
        .into_iter()
        .map(|n| n.level)
        .collect();
    assert_eq!(
        levels.iter().filter(|l| **l == NotificationLevel::Error).count(),
        1
    );
}
