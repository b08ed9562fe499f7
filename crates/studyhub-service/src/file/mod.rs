//! Lesson attachments: ingestion, payload access, and content handles.

pub mod download;
pub mod handle;
pub mod reader;
pub mod service;
pub mod upload;

pub use handle::{ContentHandle, ContentHandleRegistry, HandlePurpose};
pub use reader::LocalPayloadReader;
pub use service::{FileService, RenameFileRequest};
pub use upload::{BatchUploadReport, RejectedUpload, UploadFileRequest, UploadService};
