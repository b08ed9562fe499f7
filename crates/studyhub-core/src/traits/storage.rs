//! Raw-bytes reader consumed by file ingestion.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// A user-selected file turned into an opaque payload ready for storage.
#[derive(Debug, Clone)]
pub struct RawUpload {
    /// File name shown to the user (including extension).
    pub name: String,
    /// MIME type, already checked against the allow-list.
    pub mime_type: String,
    /// The file content.
    pub data: Bytes,
}

/// Turns a user-supplied file selection into a [`RawUpload`].
///
/// Implementations must reject content types outside the allow-list
/// before reading any bytes.
#[async_trait]
pub trait PayloadReader: Send + Sync + std::fmt::Debug + 'static {
    /// Read the file at `path`.
    async fn read(&self, path: &Path) -> AppResult<RawUpload>;
}
