//! Topic repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_core::traits::{ChildRepository, Repository};
use studyhub_core::types::{FolderId, TopicId};
use studyhub_entity::topic::{CreateTopic, Topic};

const COLUMNS: &str = "id, folder_id, name, created_at, sort_order";

/// Repository for topic records, indexed by owning folder.
#[derive(Debug, Clone)]
pub struct TopicRepository {
    pool: SqlitePool,
}

impl TopicRepository {
    /// Create a new topic repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Topic, TopicId, CreateTopic> for TopicRepository {
    async fn add(&self, data: &CreateTopic) -> AppResult<TopicId> {
        let result = sqlx::query(
            "INSERT INTO topics (folder_id, name, created_at, sort_order) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(data.folder_id)
        .bind(&data.name)
        .bind(Utc::now())
        .bind(data.order)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StorageUnavailable, "Failed to create topic", e)
        })?;
        Ok(TopicId(result.last_insert_rowid()))
    }

    async fn get(&self, id: TopicId) -> AppResult<Option<Topic>> {
        sqlx::query_as::<_, Topic>(&format!("SELECT {COLUMNS} FROM topics WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to find topic", e)
            })
    }

    async fn list(&self) -> AppResult<Vec<Topic>> {
        sqlx::query_as::<_, Topic>(&format!("SELECT {COLUMNS} FROM topics"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to list topics", e)
            })
    }

    async fn update(&self, topic: &Topic) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE topics SET folder_id = ?2, name = ?3, created_at = ?4, sort_order = ?5 \
             WHERE id = ?1",
        )
        .bind(topic.id)
        .bind(topic.folder_id)
        .bind(&topic.name)
        .bind(topic.created_at)
        .bind(topic.order)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StorageUnavailable, "Failed to update topic", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: TopicId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM topics WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to delete topic", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to count topics", e)
            })?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ChildRepository<Topic, TopicId, FolderId> for TopicRepository {
    async fn list_by_parent(&self, folder_id: FolderId) -> AppResult<Vec<Topic>> {
        sqlx::query_as::<_, Topic>(&format!(
            "SELECT {COLUMNS} FROM topics INDEXED BY topics_by_parent WHERE folder_id = ?1"
        ))
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                "Failed to list topics by folder",
                e,
            )
        })
    }

    async fn count_by_parent(&self, folder_id: FolderId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM topics INDEXED BY topics_by_parent WHERE folder_id = ?1",
        )
        .bind(folder_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                "Failed to count topics by folder",
                e,
            )
        })?;
        Ok(count as u64)
    }

    async fn find_orphans(&self) -> AppResult<Vec<TopicId>> {
        sqlx::query_scalar(
            "SELECT t.id FROM topics t \
             WHERE NOT EXISTS (SELECT 1 FROM folders f WHERE f.id = t.folder_id) \
             ORDER BY t.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StorageUnavailable, "Failed to find orphan topics", e)
        })
    }
}
