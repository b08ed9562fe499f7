//! Links embedded in a lesson record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use studyhub_core::types::LinkId;

/// An external reference attached to a lesson.
///
/// Links are stored inside the lesson row, not in their own collection,
/// and are deleted together with the lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonLink {
    /// Identifier, unique within the lesson.
    pub id: LinkId,
    /// Display title.
    pub title: String,
    /// Target URL (`http` or `https`).
    pub url: String,
    /// When the link was added.
    pub added_at: DateTime<Utc>,
}

impl LessonLink {
    /// Create a new link stamped with the current time.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: LinkId::new(),
            title: title.into(),
            url: url.into(),
            added_at: Utc::now(),
        }
    }
}
