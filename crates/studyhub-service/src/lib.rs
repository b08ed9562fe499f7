//! # studyhub-service
//!
//! Use cases for StudyHub. The per-collection services validate requests
//! and talk to the store; [`StudyHub`] wraps them with the reload,
//! revalidate, and notify sequence that keeps the view state consistent.
//!
//! Services follow constructor injection: each one owns a cloned
//! [`StudyStore`](studyhub_database::StudyStore) handle.

pub mod app;
pub mod file;
pub mod folder;
pub mod lesson;
pub mod ordering;
pub mod topic;
pub mod validation;

pub use app::StudyHub;
pub use file::{
    BatchUploadReport, ContentHandle, ContentHandleRegistry, FileService, HandlePurpose,
    LocalPayloadReader, RenameFileRequest, UploadFileRequest, UploadService,
};
pub use folder::{CreateFolderRequest, FolderService, UpdateFolderRequest};
pub use lesson::{AddLinkRequest, CreateLessonRequest, LessonService, UpdateLessonRequest};
pub use topic::{CreateTopicRequest, TopicService, UpdateTopicRequest};
