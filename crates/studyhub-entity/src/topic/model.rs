//! Topic entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use studyhub_core::types::{FolderId, Ordered, TopicId};

/// A topic grouping lessons inside a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Topic {
    /// Unique topic identifier.
    pub id: TopicId,
    /// The owning folder.
    pub folder_id: FolderId,
    /// Topic name.
    pub name: String,
    /// When the topic was created.
    pub created_at: DateTime<Utc>,
    /// Display position within the folder (absent on legacy rows).
    #[sqlx(rename = "sort_order")]
    pub order: Option<i64>,
}

impl Ordered for Topic {
    fn display_order(&self) -> Option<i64> {
        self.order
    }

    fn sort_id(&self) -> i64 {
        self.id.0
    }
}

/// Data required to create a new topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTopic {
    /// The owning folder.
    pub folder_id: FolderId,
    /// Topic name.
    pub name: String,
    /// Display position.
    pub order: Option<i64>,
}
