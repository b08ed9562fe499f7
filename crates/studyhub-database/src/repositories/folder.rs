//! Folder repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_core::traits::Repository;
use studyhub_core::types::FolderId;
use studyhub_entity::folder::{CreateFolder, Folder};

const COLUMNS: &str = "id, name, color, created_at, sort_order";

/// Repository for folder records.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: SqlitePool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Folder, FolderId, CreateFolder> for FolderRepository {
    async fn add(&self, data: &CreateFolder) -> AppResult<FolderId> {
        let result = sqlx::query(
            "INSERT INTO folders (name, color, created_at, sort_order) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&data.name)
        .bind(&data.color)
        .bind(Utc::now())
        .bind(data.order)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StorageUnavailable, "Failed to create folder", e)
        })?;
        Ok(FolderId(result.last_insert_rowid()))
    }

    async fn get(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(&format!("SELECT {COLUMNS} FROM folders WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to find folder", e)
            })
    }

    async fn list(&self) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(&format!("SELECT {COLUMNS} FROM folders"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to list folders", e)
            })
    }

    async fn update(&self, folder: &Folder) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE folders SET name = ?2, color = ?3, created_at = ?4, sort_order = ?5 \
             WHERE id = ?1",
        )
        .bind(folder.id)
        .bind(&folder.name)
        .bind(&folder.color)
        .bind(folder.created_at)
        .bind(folder.order)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StorageUnavailable, "Failed to update folder", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to delete folder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to count folders", e)
            })?;
        Ok(count as u64)
    }
}
