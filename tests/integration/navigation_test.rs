//! View-state transitions, search precedence, and subscribers.

use studyhub_core::error::ErrorKind;
use studyhub_core::types::TopicId;
use studyhub_view::{Navigation, StateChange, View, ViewKind};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_search_wins_over_selected_lesson() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;
    app.hub.navigate_lesson(seeded.lesson).unwrap();

    app.hub
        .set(StateChange::SearchQuery("gram".to_string()))
        .await
        .unwrap();

    assert_eq!(app.hub.state().kind(), ViewKind::Search);
    assert_eq!(app.hub.state().current_lesson_id(), None);
    match app.hub.current_view() {
        View::Search(view) => {
            assert_eq!(view.query, "gram");
            assert!(view.hits.iter().any(|hit| hit.title == "Grammar"));
        }
        other => panic!("expected search view, got {:?}", other.kind()),
    }
}

#[tokio::test]
async fn test_blank_search_returns_to_dashboard() {
    let app = TestApp::new().await;
    app.hub.search("x");
    assert_eq!(app.hub.search("   "), Navigation::Dashboard);
}

#[tokio::test]
async fn test_navigation_fills_ancestors() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;

    let state = app.hub.navigate_lesson(seeded.lesson).unwrap();
    assert_eq!(state.current_folder_id(), Some(seeded.folder));
    assert_eq!(state.current_topic_id(), Some(seeded.topic));

    match app.hub.current_view() {
        View::Lesson(view) => {
            assert_eq!(view.lesson.id, seeded.lesson);
            assert_eq!(view.files.len(), 1);
            assert!(view.preview.is_none());
        }
        other => panic!("expected lesson view, got {:?}", other.kind()),
    }

    assert_eq!(app.hub.navigate_up().kind(), ViewKind::Topic);
    assert_eq!(app.hub.navigate_up().kind(), ViewKind::Folder);
    assert_eq!(app.hub.navigate_up(), Navigation::Dashboard);
}

#[tokio::test]
async fn test_navigate_to_missing_topic() {
    let app = TestApp::new().await;
    let before = app.broadcasts();

    let err = app.hub.navigate_topic(TopicId(12)).unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(app.hub.state(), Navigation::Dashboard);
    assert_eq!(app.broadcasts(), before);
}

#[tokio::test]
async fn test_each_transition_broadcasts_once() {
    let app = TestApp::new().await;
    let seeded = app.seed().await;
    let before = app.broadcasts();

    app.hub.navigate_folder(seeded.folder).unwrap();
    app.hub.navigate_topic(seeded.topic).unwrap();
    app.hub.navigate_dashboard();

    let seen = app.seen.lock().unwrap();
    assert_eq!(seen.len(), before + 3);
    assert_eq!(seen[before].kind(), ViewKind::Folder);
    assert_eq!(seen[before + 1].kind(), ViewKind::Topic);
    assert_eq!(seen[before + 2], Navigation::Dashboard);
}

#[tokio::test]
async fn test_unsubscribed_listener_is_not_called() {
    let mut app = TestApp::new().await;
    let subscription = app.subscription.take().unwrap();
    let before = app.broadcasts();

    assert!(subscription.unsubscribe());
    app.hub.search("anything");

    assert_eq!(app.broadcasts(), before);
}
