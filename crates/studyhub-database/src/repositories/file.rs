//! File repository implementation.
//!
//! Listings never load the payload column; the bytes are fetched on
//! demand through [`FileRepository::read_payload`].

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use sqlx::SqlitePool;

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_core::traits::{ChildRepository, Repository};
use studyhub_core::types::{FileId, LessonId};
use studyhub_entity::file::{CreateFile, File};

const COLUMNS: &str = "id, lesson_id, name, mime_type, size_bytes, uploaded_at";

/// Repository for file records, indexed by owning lesson.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: SqlitePool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read a file's binary payload.
    pub async fn read_payload(&self, id: FileId) -> AppResult<Option<Bytes>> {
        let payload: Option<Vec<u8>> =
            sqlx::query_scalar("SELECT payload FROM files WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::StorageUnavailable,
                        "Failed to read file payload",
                        e,
                    )
                })?;
        Ok(payload.map(Bytes::from))
    }

    /// Sum of stored payload sizes.
    pub async fn total_size(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(size_bytes), 0) FROM files")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to sum file sizes", e)
            })?;
        Ok(total.max(0) as u64)
    }
}

#[async_trait]
impl Repository<File, FileId, CreateFile> for FileRepository {
    async fn add(&self, data: &CreateFile) -> AppResult<FileId> {
        let result = sqlx::query(
            "INSERT INTO files (lesson_id, name, mime_type, size_bytes, payload, uploaded_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(data.lesson_id)
        .bind(&data.name)
        .bind(data.content_type.mime())
        .bind(data.payload.len() as i64)
        .bind(data.payload.as_ref())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StorageUnavailable, "Failed to store file", e)
        })?;
        Ok(FileId(result.last_insert_rowid()))
    }

    async fn get(&self, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(&format!("SELECT {COLUMNS} FROM files WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to find file", e)
            })
    }

    async fn list(&self) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(&format!("SELECT {COLUMNS} FROM files"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to list files", e)
            })
    }

    /// Replace the record's metadata. The payload is left untouched.
    async fn update(&self, file: &File) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE files SET lesson_id = ?2, name = ?3, mime_type = ?4, size_bytes = ?5, \
             uploaded_at = ?6 WHERE id = ?1",
        )
        .bind(file.id)
        .bind(file.lesson_id)
        .bind(&file.name)
        .bind(&file.mime_type)
        .bind(file.size_bytes)
        .bind(file.uploaded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StorageUnavailable, "Failed to update file", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: FileId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to delete file", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to count files", e)
            })?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ChildRepository<File, FileId, LessonId> for FileRepository {
    async fn list_by_parent(&self, lesson_id: LessonId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(&format!(
            "SELECT {COLUMNS} FROM files INDEXED BY files_by_parent WHERE lesson_id = ?1"
        ))
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                "Failed to list files by lesson",
                e,
            )
        })
    }

    async fn count_by_parent(&self, lesson_id: LessonId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM files INDEXED BY files_by_parent WHERE lesson_id = ?1",
        )
        .bind(lesson_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                "Failed to count files by lesson",
                e,
            )
        })?;
        Ok(count as u64)
    }

    async fn find_orphans(&self) -> AppResult<Vec<FileId>> {
        sqlx::query_scalar(
            "SELECT f.id FROM files f \
             WHERE NOT EXISTS (SELECT 1 FROM lessons l WHERE l.id = f.lesson_id) \
             ORDER BY f.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StorageUnavailable, "Failed to find orphan files", e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::migrated_pool;
    use studyhub_entity::file::ContentType;

    #[tokio::test]
    async fn test_payload_is_read_separately() {
        let repo = FileRepository::new(migrated_pool().await);
        let id = repo
            .add(&CreateFile {
                lesson_id: LessonId(7),
                name: "rules.pdf".to_string(),
                content_type: ContentType::Pdf,
                payload: Bytes::from_static(b"%PDF-1.7 rules"),
            })
            .await
            .unwrap();

        let file = repo.get(id).await.unwrap().unwrap();
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.size_bytes, 14);
        assert_eq!(repo.total_size().await.unwrap(), 14);

        let payload = repo.read_payload(id).await.unwrap().unwrap();
        assert_eq!(&payload[..], b"%PDF-1.7 rules");
        assert!(repo.read_payload(FileId(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rename_keeps_payload() {
        let repo = FileRepository::new(migrated_pool().await);
        let id = repo
            .add(&CreateFile {
                lesson_id: LessonId(1),
                name: "draft.docx".to_string(),
                content_type: ContentType::Docx,
                payload: Bytes::from_static(b"PK\x03\x04"),
            })
            .await
            .unwrap();

        let mut file = repo.get(id).await.unwrap().unwrap();
        file.name = "final.docx".to_string();
        assert!(repo.update(&file).await.unwrap());

        assert_eq!(repo.get(id).await.unwrap().unwrap().name, "final.docx");
        assert_eq!(repo.read_payload(id).await.unwrap().unwrap().len(), 4);
        assert_eq!(repo.count_by_parent(LessonId(1)).await.unwrap(), 1);
    }
}
