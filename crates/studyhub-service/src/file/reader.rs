//! Local filesystem payload reader.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use studyhub_core::AppError;
use studyhub_core::error::ErrorKind;
use studyhub_core::result::AppResult;
use studyhub_core::traits::{PayloadReader, RawUpload};
use studyhub_entity::file::ContentType;

/// Reads uploads from the local filesystem with `tokio::fs`.
#[derive(Debug, Clone)]
pub struct LocalPayloadReader {
    max_size_bytes: u64,
}

impl LocalPayloadReader {
    pub fn new(max_size_bytes: u64) -> Self {
        Self { max_size_bytes }
    }
}

#[async_trait]
impl PayloadReader for LocalPayloadReader {
    async fn read(&self, path: &Path) -> AppResult<RawUpload> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::validation(format!("'{}' does not name a file", path.display()))
            })?;
        let content_type = ContentType::from_path(path).ok_or_else(|| {
            AppError::unsupported_content_type(format!(
                "'{name}' is not a PDF or Word document"
            ))
        })?;

        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Io,
                format!("Cannot open '{}'", path.display()),
                e,
            )
        })?;
        if !metadata.is_file() {
            return Err(AppError::validation(format!(
                "'{}' is not a regular file",
                path.display()
            )));
        }
        if metadata.len() > self.max_size_bytes {
            return Err(AppError::validation(format!(
                "'{name}' exceeds the maximum upload size of {} bytes",
                self.max_size_bytes
            )));
        }

        let data = tokio::fs::read(path).await?;
        debug!(path = %path.display(), size = data.len(), "Payload read");

        Ok(RawUpload {
            name,
            mime_type: content_type.mime().to_string(),
            data: Bytes::from(data),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "studyhub-reader-{tag}-{}",
            studyhub_core::types::HandleId::new()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_reads_allowed_file() {
        let dir = scratch_dir("ok");
        let path = dir.join("Rules.PDF");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let upload = LocalPayloadReader::new(1024).read(&path).await.unwrap();
        assert_eq!(upload.name, "Rules.PDF");
        assert_eq!(upload.mime_type, "application/pdf");
        assert_eq!(upload.data.as_ref(), b"%PDF-1.4");
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_rejects_before_reading() {
        let reader = LocalPayloadReader::new(1024);
        // The path does not exist: the extension check must fail first.
        let err = reader
            .read(Path::new("/nonexistent/notes.txt"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedContentType);

        let err = reader
            .read(Path::new("/nonexistent/notes.pdf"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Io);
    }

    #[tokio::test]
    async fn test_rejects_oversize() {
        let dir = scratch_dir("big");
        let path = dir.join("big.docx");
        std::fs::write(&path, vec![0u8; 64]).unwrap();

        let err = LocalPayloadReader::new(16).read(&path).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        std::fs::remove_dir_all(dir).unwrap();
    }
}
