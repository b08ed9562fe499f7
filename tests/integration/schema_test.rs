//! Opening stores written by older versions.

use studyhub_core::config::DatabaseConfig;
use studyhub_database::{DatabasePool, StudyStore};
use studyhub_view::NotificationLevel;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_legacy_store_is_upgraded_on_open() {
    let db = DatabasePool::connect(&DatabaseConfig::in_memory())
        .await
        .unwrap();
    for sql in [
        "CREATE TABLE folders (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, \
         color TEXT NOT NULL DEFAULT '#4361ee', created_at TEXT NOT NULL)",
        "CREATE TABLE topics (id INTEGER PRIMARY KEY AUTOINCREMENT, folder_id INTEGER NOT NULL, \
         name TEXT NOT NULL, created_at TEXT NOT NULL)",
        "CREATE INDEX topics_by_parent ON topics (name)",
        "INSERT INTO folders (name, created_at) VALUES ('Second', '2023-01-02T00:00:00Z')",
        "INSERT INTO folders (name, created_at) VALUES ('First', '2023-01-01T00:00:00Z')",
        "INSERT INTO topics (folder_id, name, created_at) VALUES (1, 'Old topic', '2023-01-03T00:00:00Z')",
    ] {
        sqlx::query(sql).execute(db.pool()).await.unwrap();
    }

    let store = StudyStore::from_pool(db).await.unwrap();
    let report = store.upgrade_report().clone();
    assert_eq!(report.added_order_columns, vec!["folders", "topics"]);
    assert_eq!(report.rebuilt_indexes, vec!["topics_by_parent"]);

    let app = TestApp::with_store(store).await;
    let snapshot = app.hub.snapshot();

    // Without a stored order, records fall back to identifier order.
    let names: Vec<&str> = snapshot.folders().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Second", "First"]);
    assert_eq!(snapshot.topics().len(), 1);
    assert_eq!(snapshot.topics()[0].order, None);

    let notices = app.hub.notifications().active();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NotificationLevel::Info);
}

#[tokio::test]
async fn test_reopened_store_needs_no_upgrade() {
    let app = TestApp::new().await;
    assert!(app.hub.store().upgrade_report().is_noop());
    assert!(app.hub.notifications().active().is_empty());
}
