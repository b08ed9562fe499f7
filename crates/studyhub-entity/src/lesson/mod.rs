//! Lesson domain entities.

pub mod link;
pub mod model;

pub use link::LessonLink;
pub use model::{CreateLesson, Lesson};
