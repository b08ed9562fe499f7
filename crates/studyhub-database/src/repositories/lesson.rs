//! Lesson repository implementation.
//!
//! Links are embedded in the lesson row as a JSON array and are written
//! and deleted together with their lesson.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::types::Json;

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_core::traits::{ChildRepository, Repository};
use studyhub_core::types::{LessonId, TopicId};
use studyhub_entity::lesson::{CreateLesson, Lesson, LessonLink};

const COLUMNS: &str = "id, topic_id, title, date, description, sort_order, created_at, links";

/// Repository for lesson records, indexed by owning topic.
#[derive(Debug, Clone)]
pub struct LessonRepository {
    pool: SqlitePool,
}

impl LessonRepository {
    /// Create a new lesson repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Lesson, LessonId, CreateLesson> for LessonRepository {
    async fn add(&self, data: &CreateLesson) -> AppResult<LessonId> {
        let no_links: Vec<LessonLink> = Vec::new();
        let result = sqlx::query(
            "INSERT INTO lessons (topic_id, title, date, description, sort_order, created_at, links) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(data.topic_id)
        .bind(&data.title)
        .bind(data.date)
        .bind(&data.description)
        .bind(data.order)
        .bind(Utc::now())
        .bind(Json(&no_links))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StorageUnavailable, "Failed to create lesson", e)
        })?;
        Ok(LessonId(result.last_insert_rowid()))
    }

    async fn get(&self, id: LessonId) -> AppResult<Option<Lesson>> {
        sqlx::query_as::<_, Lesson>(&format!("SELECT {COLUMNS} FROM lessons WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to find lesson", e)
            })
    }

    async fn list(&self) -> AppResult<Vec<Lesson>> {
        sqlx::query_as::<_, Lesson>(&format!("SELECT {COLUMNS} FROM lessons"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to list lessons", e)
            })
    }

    async fn update(&self, lesson: &Lesson) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE lessons SET topic_id = ?2, title = ?3, date = ?4, description = ?5, \
             sort_order = ?6, created_at = ?7, links = ?8 WHERE id = ?1",
        )
        .bind(lesson.id)
        .bind(lesson.topic_id)
        .bind(&lesson.title)
        .bind(lesson.date)
        .bind(&lesson.description)
        .bind(lesson.order)
        .bind(lesson.created_at)
        .bind(Json(&lesson.links))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StorageUnavailable, "Failed to update lesson", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: LessonId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to delete lesson", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to count lessons", e)
            })?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ChildRepository<Lesson, LessonId, TopicId> for LessonRepository {
    async fn list_by_parent(&self, topic_id: TopicId) -> AppResult<Vec<Lesson>> {
        sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {COLUMNS} FROM lessons INDEXED BY lessons_by_parent WHERE topic_id = ?1"
        ))
        .bind(topic_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                "Failed to list lessons by topic",
                e,
            )
        })
    }

    async fn count_by_parent(&self, topic_id: TopicId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM lessons INDEXED BY lessons_by_parent WHERE topic_id = ?1",
        )
        .bind(topic_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                "Failed to count lessons by topic",
                e,
            )
        })?;
        Ok(count as u64)
    }

    async fn find_orphans(&self) -> AppResult<Vec<LessonId>> {
        sqlx::query_scalar(
            "SELECT l.id FROM lessons l \
             WHERE NOT EXISTS (SELECT 1 FROM topics t WHERE t.id = l.topic_id) \
             ORDER BY l.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                "Failed to find orphan lessons",
                e,
            )
        })
    }
}
