//! Repository implementations for the four StudyHub collections.

pub mod file;
pub mod folder;
pub mod lesson;
pub mod topic;

pub use file::FileRepository;
pub use folder::FolderRepository;
pub use lesson::LessonRepository;
pub use topic::TopicRepository;
