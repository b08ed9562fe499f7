//! Lesson management and embedded links.

pub mod links;
pub mod service;

pub use links::AddLinkRequest;
pub use service::{CreateLessonRequest, LessonService, UpdateLessonRequest};
