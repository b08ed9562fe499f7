//! # studyhub-entity
//!
//! Domain entity models for StudyHub. Every struct in this crate
//! represents a database table row or a domain value object. Row structs
//! derive `sqlx::FromRow` and implement [`Ordered`] so every collection
//! shares one display-order rule.
//!
//! [`Ordered`]: studyhub_core::types::Ordered

pub mod file;
pub mod folder;
pub mod lesson;
pub mod topic;

pub use file::{ContentType, CreateFile, File};
pub use folder::{CreateFolder, Folder};
pub use lesson::{CreateLesson, Lesson, LessonLink};
pub use topic::{CreateTopic, Topic};
