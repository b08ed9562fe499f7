//! The opened study store.

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{debug, info};

use studyhub_core::config::DatabaseConfig;
use studyhub_core::result::AppResult;
use studyhub_core::traits::Repository;
use studyhub_core::types::{FileId, LessonId, TopicId};
use studyhub_entity::file::File;
use studyhub_entity::lesson::Lesson;
use studyhub_entity::topic::Topic;

use crate::cascade::CascadeDeleter;
use crate::connection::DatabasePool;
use crate::migration::{UpgradeReport, run_migrations, upgrade_schema};
use crate::repositories::{FileRepository, FolderRepository, LessonRepository, TopicRepository};

/// The four collections, the cascade engine, and their shared pool.
///
/// No read or write is possible before migrations and the schema
/// upgrade have completed, since both run inside [`StudyStore::open`].
#[derive(Debug, Clone)]
pub struct StudyStore {
    db: DatabasePool,
    folders: Arc<FolderRepository>,
    topics: Arc<TopicRepository>,
    lessons: Arc<LessonRepository>,
    files: Arc<FileRepository>,
    cascade: CascadeDeleter,
    upgrade: UpgradeReport,
}

impl StudyStore {
    /// Open the store, apply migrations, and repair legacy layouts.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        let db = DatabasePool::connect(config).await?;
        Self::from_pool(db).await
    }

    /// Prepare an already connected pool.
    pub async fn from_pool(db: DatabasePool) -> AppResult<Self> {
        run_migrations(db.pool()).await?;
        let upgrade = upgrade_schema(db.pool()).await?;

        let pool = db.pool().clone();
        let folders = Arc::new(FolderRepository::new(pool.clone()));
        let topics = Arc::new(TopicRepository::new(pool.clone()));
        let lessons = Arc::new(LessonRepository::new(pool.clone()));
        let files = Arc::new(FileRepository::new(pool));
        let cascade = CascadeDeleter::new(
            folders.clone(),
            topics.clone(),
            lessons.clone(),
            files.clone(),
        );

        info!("Study store ready");
        Ok(Self {
            db,
            folders,
            topics,
            lessons,
            files,
            cascade,
            upgrade,
        })
    }

    /// Folder collection.
    pub fn folders(&self) -> &Arc<FolderRepository> {
        &self.folders
    }

    /// Topic collection.
    pub fn topics(&self) -> &Arc<TopicRepository> {
        &self.topics
    }

    /// Lesson collection.
    pub fn lessons(&self) -> &Arc<LessonRepository> {
        &self.lessons
    }

    /// File collection.
    pub fn files(&self) -> &Arc<FileRepository> {
        &self.files
    }

    /// The cascade delete engine.
    pub fn cascade(&self) -> &CascadeDeleter {
        &self.cascade
    }

    /// A topic whose folder still exists.
    ///
    /// Records left behind by an interrupted cascade are logically
    /// deleted, so an orphan resolves to `None` just like a missing row.
    pub async fn live_topic(&self, topic_id: TopicId) -> AppResult<Option<Topic>> {
        let Some(topic) = self.topics.get(topic_id).await? else {
            return Ok(None);
        };
        if self.folders.get(topic.folder_id).await?.is_none() {
            debug!(topic_id = %topic_id, folder_id = %topic.folder_id, "Topic is orphaned");
            return Ok(None);
        }
        Ok(Some(topic))
    }

    /// A lesson whose topic and folder still exist.
    pub async fn live_lesson(&self, lesson_id: LessonId) -> AppResult<Option<Lesson>> {
        let Some(lesson) = self.lessons.get(lesson_id).await? else {
            return Ok(None);
        };
        if self.live_topic(lesson.topic_id).await?.is_none() {
            debug!(lesson_id = %lesson_id, "Lesson is orphaned");
            return Ok(None);
        }
        Ok(Some(lesson))
    }

    /// A file whose whole ancestor chain still exists.
    pub async fn live_file(&self, file_id: FileId) -> AppResult<Option<File>> {
        let Some(file) = self.files.get(file_id).await? else {
            return Ok(None);
        };
        if self.live_lesson(file.lesson_id).await?.is_none() {
            debug!(file_id = %file_id, "File is orphaned");
            return Ok(None);
        }
        Ok(Some(file))
    }

    /// What the schema upgrade changed when the store was opened.
    pub fn upgrade_report(&self) -> &UpgradeReport {
        &self.upgrade
    }

    /// The underlying SQLite pool.
    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    /// Close all connections.
    pub async fn close(&self) {
        self.db.close().await;
    }
}
