//! Shared test helpers for integration tests.

use std::sync::{Arc, Mutex};

use bytes::Bytes;

use studyhub_core::config::{AppConfig, DatabaseConfig};
use studyhub_core::types::{FileId, FolderId, LessonId, TopicId};
use studyhub_database::StudyStore;
use studyhub_service::{
    CreateFolderRequest, CreateLessonRequest, CreateTopicRequest, StudyHub,
};
use studyhub_view::{Navigation, Subscription};

/// Test application context
pub struct TestApp {
    /// The controller under test
    pub hub: StudyHub,
    /// States seen by the recording subscriber, in order
    pub seen: Arc<Mutex<Vec<Navigation>>>,
    /// Keeps the recording subscriber registered
    pub subscription: Option<Subscription>,
}

/// Identifiers of the sample hierarchy created by [`TestApp::seed`].
#[derive(Debug, Clone, Copy)]
pub struct Seeded {
    pub folder: FolderId,
    pub topic: TopicId,
    pub lesson: LessonId,
    pub file: FileId,
}

impl TestApp {
    /// Create a controller over a fresh in-memory store
    pub async fn new() -> Self {
        let store = StudyStore::open(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to open in-memory store");
        Self::with_store(store).await
    }

    /// Create a controller over an already opened store
    pub async fn with_store(store: StudyStore) -> Self {
        let config = AppConfig {
            database: DatabaseConfig::in_memory(),
            ..AppConfig::default()
        };
        let hub = StudyHub::with_store(config, store)
            .await
            .expect("Failed to build controller");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = hub.subscribe(move |state| {
            sink.lock().expect("recorder lock").push(state.clone());
        });

        Self {
            hub,
            seen,
            subscription: Some(subscription),
        }
    }

    /// Number of broadcasts received so far
    pub fn broadcasts(&self) -> usize {
        self.seen.lock().expect("recorder lock").len()
    }

    /// Folder "A" → topic "Grammar" → lesson "Ser vs Estar" → "rules.pdf"
    pub async fn seed(&self) -> Seeded {
        let folder = self
            .hub
            .create_folder(CreateFolderRequest {
                name: "A".to_string(),
                color: Some("#e63946".to_string()),
            })
            .await
            .expect("create folder");
        let topic = self
            .hub
            .create_topic(CreateTopicRequest {
                folder_id: folder.id,
                name: "Grammar".to_string(),
            })
            .await
            .expect("create topic");
        let lesson = self
            .hub
            .create_lesson(CreateLessonRequest {
                topic_id: topic.id,
                title: "Ser vs Estar".to_string(),
                date: None,
                description: Some("Permanent versus temporary states".to_string()),
            })
            .await
            .expect("create lesson");
        let file = self
            .hub
            .upload_file(lesson.id, pdf(), "rules.pdf", "application/pdf")
            .await
            .expect("upload file");

        Seeded {
            folder: folder.id,
            topic: topic.id,
            lesson: lesson.id,
            file: file.id,
        }
    }

    /// Count rows of a table directly, bypassing the cache
    pub async fn count_rows(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(self.hub.store().pool())
            .await
            .expect("count rows")
    }
}

/// A minimal PDF payload
pub fn pdf() -> Bytes {
    Bytes::from_static(b"%PDF-1.4\n%%EOF\n")
}

/// A fresh scratch directory under the system temp dir
pub fn scratch_dir(tag: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "studyhub-it-{tag}-{}",
        studyhub_core::types::HandleId::new()
    ));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}
