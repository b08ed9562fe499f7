//! Shared domain types.

pub mod id;
pub mod kind;
pub mod sorting;

pub use id::{FileId, FolderId, HandleId, LessonId, LinkId, NotificationId, TopicId};
pub use kind::EntityKind;
pub use sorting::{Ordered, compare_ordered, is_display_sorted, sort_ordered};
