//! Content types accepted for lesson attachments.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed allow-list of attachment formats.
///
/// Anything else is rejected at ingestion and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Portable Document Format.
    Pdf,
    /// Legacy binary Word document.
    Doc,
    /// Office Open XML Word document.
    Docx,
}

impl ContentType {
    /// Every accepted content type.
    pub const ALL: [ContentType; 3] = [Self::Pdf, Self::Doc, Self::Docx];

    /// The MIME type string stored with the file.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Doc => "application/msword",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// Canonical file extension (lowercase, without dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Docx => "docx",
        }
    }

    /// Match a MIME type against the allow-list.
    ///
    /// Parameters such as `; charset=...` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        Self::ALL
            .into_iter()
            .find(|ct| ct.mime().eq_ignore_ascii_case(essence))
    }

    /// Match a file extension against the allow-list.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ct| ct.extension().eq_ignore_ascii_case(ext))
    }

    /// Infer the content type from a file path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Whether the content can be rendered inline for preview.
    pub fn is_previewable(self) -> bool {
        matches!(self, Self::Pdf)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

impl FromStr for ContentType {
    type Err = studyhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_mime(s).ok_or_else(|| {
            studyhub_core::AppError::unsupported_content_type(format!(
                "Unsupported content type '{s}'. Expected one of: PDF, DOC, DOCX"
            ))
        })
    }
}
