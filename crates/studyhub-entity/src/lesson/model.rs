//! Lesson entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use studyhub_core::types::{LessonId, LinkId, Ordered, TopicId};

use super::link::LessonLink;

/// A lesson inside a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    /// Unique lesson identifier.
    pub id: LessonId,
    /// The owning topic.
    pub topic_id: TopicId,
    /// Lesson title.
    pub title: String,
    /// Calendar date the lesson took place.
    pub date: Option<NaiveDate>,
    /// Free-form notes.
    pub description: Option<String>,
    /// Display position within the topic (absent on legacy rows).
    #[sqlx(rename = "sort_order")]
    pub order: Option<i64>,
    /// When the lesson was created.
    pub created_at: DateTime<Utc>,
    /// Embedded links, in insertion order.
    #[sqlx(json)]
    pub links: Vec<LessonLink>,
}

impl Lesson {
    /// Find an embedded link.
    pub fn link(&self, link_id: LinkId) -> Option<&LessonLink> {
        self.links.iter().find(|l| l.id == link_id)
    }

    /// Remove an embedded link. Returns `true` if it was present.
    pub fn remove_link(&mut self, link_id: LinkId) -> bool {
        let before = self.links.len();
        self.links.retain(|l| l.id != link_id);
        self.links.len() != before
    }
}

impl Ordered for Lesson {
    fn display_order(&self) -> Option<i64> {
        self.order
    }

    fn sort_id(&self) -> i64 {
        self.id.0
    }
}

/// Data required to create a new lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLesson {
    /// The owning topic.
    pub topic_id: TopicId,
    /// Lesson title.
    pub title: String,
    /// Calendar date.
    pub date: Option<NaiveDate>,
    /// Free-form notes.
    pub description: Option<String>,
    /// Display position.
    pub order: Option<i64>,
}
