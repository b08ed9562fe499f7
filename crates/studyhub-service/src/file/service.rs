//! File record operations: lookup, payload access, rename, and delete.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use studyhub_core::AppError;
use studyhub_core::result::AppResult;
use studyhub_core::traits::{ChildRepository, Repository};
use studyhub_core::types::{FileId, LessonId, sort_ordered};
use studyhub_database::{CascadeReport, CascadeTarget, StudyStore};
use studyhub_entity::file::File;

use crate::validation::{required_text, validate_request};

/// Manages stored lesson attachments.
#[derive(Debug, Clone)]
pub struct FileService {
    store: StudyStore,
}

/// Request to rename a stored file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameFileRequest {
    #[validate(length(min = 1, max = 255, message = "File name must be 1-255 characters"))]
    pub name: String,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(store: StudyStore) -> Self {
        Self { store }
    }

    /// Gets a file record by ID. Files under a deleted ancestor are not
    /// found.
    pub async fn get_file(&self, file_id: FileId) -> AppResult<File> {
        self.store
            .live_file(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// Lists a lesson's files, oldest first.
    pub async fn list_files(&self, lesson_id: LessonId) -> AppResult<Vec<File>> {
        let mut files = self.store.files().list_by_parent(lesson_id).await?;
        sort_ordered(&mut files);
        Ok(files)
    }

    /// Loads a file record together with its payload.
    pub async fn read_content(&self, file_id: FileId) -> AppResult<(File, Bytes)> {
        let file = self.get_file(file_id).await?;
        let data = self
            .store
            .files()
            .read_payload(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;
        Ok((file, data))
    }

    /// Renames a file. The content type stays as uploaded.
    pub async fn rename_file(&self, file_id: FileId, req: RenameFileRequest) -> AppResult<File> {
        validate_request(&req)?;
        let mut file = self.get_file(file_id).await?;
        file.name = required_text("File name", &req.name)?;

        if !self.store.files().update(&file).await? {
            return Err(AppError::not_found(format!("File {file_id} not found")));
        }

        info!(file_id = %file_id, name = %file.name, "File renamed");
        Ok(file)
    }

    /// Deletes a file and its payload.
    pub async fn delete_file(&self, file_id: FileId) -> AppResult<CascadeReport> {
        let report = self
            .store
            .cascade()
            .run(CascadeTarget::File(file_id))
            .await?;
        info!(file_id = %file_id, removed = report.total(), "File deleted");
        Ok(report)
    }
}
