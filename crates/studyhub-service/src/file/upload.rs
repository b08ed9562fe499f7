//! File ingestion: allow-list, size limit, and storage.

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use studyhub_core::AppError;
use studyhub_core::config::IngestConfig;
use studyhub_core::error::ErrorKind;
use studyhub_core::result::AppResult;
use studyhub_core::traits::{RawUpload, Repository};
use studyhub_core::types::LessonId;
use studyhub_database::StudyStore;
use studyhub_entity::file::{ContentType, CreateFile, File};

use crate::validation::required_text;

/// Stores uploaded documents against a lesson.
#[derive(Debug, Clone)]
pub struct UploadService {
    store: StudyStore,
    config: IngestConfig,
}

/// One file to upload.
#[derive(Debug, Clone)]
pub struct UploadFileRequest {
    pub lesson_id: LessonId,
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl UploadFileRequest {
    /// Build a request from a payload produced by a reader.
    pub fn from_raw(lesson_id: LessonId, raw: RawUpload) -> Self {
        Self {
            lesson_id,
            name: raw.name,
            mime_type: raw.mime_type,
            data: raw.data,
        }
    }
}

/// A file that a batch upload turned away.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedUpload {
    pub name: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of a batch upload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchUploadReport {
    pub uploaded: Vec<File>,
    pub rejected: Vec<RejectedUpload>,
}

impl BatchUploadReport {
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(store: StudyStore, config: IngestConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Stores one file.
    ///
    /// Content type is checked first, then size, then the owning lesson.
    pub async fn upload(&self, req: UploadFileRequest) -> AppResult<File> {
        let name = required_text("File name", &req.name)?;
        let Some(content_type) = ContentType::from_mime(&req.mime_type) else {
            warn!(name = %name, mime_type = %req.mime_type, "Upload rejected by allow-list");
            return Err(AppError::unsupported_content_type(format!(
                "'{name}' has unsupported type '{}'; only PDF and Word documents are accepted",
                req.mime_type
            )));
        };
        if req.data.is_empty() {
            return Err(AppError::validation(format!("'{name}' is empty")));
        }
        if req.data.len() as u64 > self.config.max_upload_size_bytes {
            warn!(name = %name, size = req.data.len(), "Upload rejected by size limit");
            return Err(AppError::validation(format!(
                "'{name}' exceeds the maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }
        self.store
            .live_lesson(req.lesson_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Lesson {} not found", req.lesson_id)))?;

        let id = self
            .store
            .files()
            .add(&CreateFile {
                lesson_id: req.lesson_id,
                name,
                content_type,
                payload: req.data,
            })
            .await?;
        let file = self
            .store
            .files()
            .get(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("File {id} vanished after insert")))?;

        info!(
            file_id = %file.id,
            lesson_id = %file.lesson_id,
            size = file.size_bytes,
            mime_type = %file.mime_type,
            "File uploaded"
        );
        Ok(file)
    }

    /// Stores several files, continuing past individual failures.
    ///
    /// Only a batch larger than the configured maximum fails as a whole.
    pub async fn upload_batch(&self, batch: Vec<UploadFileRequest>) -> AppResult<BatchUploadReport> {
        if batch.len() > self.config.max_batch_files {
            return Err(AppError::validation(format!(
                "At most {} files can be uploaded at once, got {}",
                self.config.max_batch_files,
                batch.len()
            )));
        }

        let mut report = BatchUploadReport::default();
        for req in batch {
            let name = req.name.clone();
            match self.upload(req).await {
                Ok(file) => report.uploaded.push(file),
                Err(e) => report.rejected.push(RejectedUpload {
                    name,
                    kind: e.kind,
                    message: e.message,
                }),
            }
        }
        Ok(report)
    }
}
