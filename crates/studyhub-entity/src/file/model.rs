//! File entity model.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use studyhub_core::types::{FileId, LessonId, Ordered};

use super::content_type::ContentType;

/// A document attached to a lesson.
///
/// The binary payload lives in the same row but is not loaded with the
/// record; it is read on demand for preview or download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The owning lesson.
    pub lesson_id: LessonId,
    /// The file name (including extension).
    pub name: String,
    /// MIME type, one of the allow-listed types.
    pub mime_type: String,
    /// Payload size in bytes.
    pub size_bytes: i64,
    /// When the file was uploaded.
    pub uploaded_at: DateTime<Utc>,
}

impl File {
    /// The allow-listed content type, if the stored MIME type is known.
    pub fn content_type(&self) -> Option<ContentType> {
        ContentType::from_mime(&self.mime_type)
    }

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }
}

impl Ordered for File {
    fn display_order(&self) -> Option<i64> {
        None
    }

    fn sort_id(&self) -> i64 {
        self.id.0
    }
}

/// Data required to store a new file.
#[derive(Debug, Clone)]
pub struct CreateFile {
    /// The owning lesson.
    pub lesson_id: LessonId,
    /// The file name.
    pub name: String,
    /// Allow-listed content type.
    pub content_type: ContentType,
    /// The file content.
    pub payload: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        let file = File {
            id: FileId(1),
            lesson_id: LessonId(1),
            name: "Rules.PDF".to_string(),
            mime_type: ContentType::Pdf.mime().to_string(),
            size_bytes: 10,
            uploaded_at: Utc::now(),
        };
        assert_eq!(file.extension().as_deref(), Some("pdf"));
        assert_eq!(file.content_type(), Some(ContentType::Pdf));
    }
}
