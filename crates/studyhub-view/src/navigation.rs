//! The navigation state and the transitions that produce it.

use std::fmt;

use serde::{Deserialize, Serialize};

use studyhub_cache::CacheSnapshot;
use studyhub_core::AppError;
use studyhub_core::result::AppResult;
use studyhub_core::types::{FileId, FolderId, LessonId, TopicId};

/// The five mutually exclusive views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Dashboard,
    Folder,
    Topic,
    Lesson,
    Search,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Dashboard => "dashboard",
            Self::Folder => "folder",
            Self::Topic => "topic",
            Self::Lesson => "lesson",
            Self::Search => "search",
        };
        f.write_str(label)
    }
}

/// Where the user currently is.
///
/// Each variant carries exactly the identifiers its view needs, so a
/// half-updated selection (a topic without its folder, a search that
/// still points at a lesson) cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Navigation {
    #[default]
    Dashboard,
    Folder {
        folder_id: FolderId,
    },
    Topic {
        folder_id: FolderId,
        topic_id: TopicId,
    },
    Lesson {
        folder_id: FolderId,
        topic_id: TopicId,
        lesson_id: LessonId,
        preview_file_id: Option<FileId>,
    },
    Search {
        query: String,
    },
}

/// A single-field change, applied with fixed precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    Folder(Option<FolderId>),
    Topic(Option<TopicId>),
    Lesson(Option<LessonId>),
    SearchQuery(String),
    Preview(Option<FileId>),
}

impl Navigation {
    /// Open a folder that must exist in `snapshot`.
    pub fn folder(snapshot: &CacheSnapshot, folder_id: FolderId) -> AppResult<Self> {
        snapshot
            .folder(folder_id)
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
        Ok(Self::Folder { folder_id })
    }

    /// Open a topic whose folder must also resolve.
    pub fn topic(snapshot: &CacheSnapshot, topic_id: TopicId) -> AppResult<Self> {
        let topic = snapshot
            .topic(topic_id)
            .ok_or_else(|| AppError::not_found(format!("Topic {topic_id} not found")))?;
        Ok(Self::Topic {
            folder_id: topic.folder_id,
            topic_id,
        })
    }

    /// Open a lesson whose topic and folder must also resolve.
    pub fn lesson(snapshot: &CacheSnapshot, lesson_id: LessonId) -> AppResult<Self> {
        let (folder, topic, _) = snapshot
            .lesson_ancestry(lesson_id)
            .ok_or_else(|| AppError::not_found(format!("Lesson {lesson_id} not found")))?;
        Ok(Self::Lesson {
            folder_id: folder.id,
            topic_id: topic.id,
            lesson_id,
            preview_file_id: None,
        })
    }

    /// A search, or the dashboard when the query is blank.
    pub fn search(query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            Self::Dashboard
        } else {
            Self::Search {
                query: query.to_string(),
            }
        }
    }

    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Dashboard => ViewKind::Dashboard,
            Self::Folder { .. } => ViewKind::Folder,
            Self::Topic { .. } => ViewKind::Topic,
            Self::Lesson { .. } => ViewKind::Lesson,
            Self::Search { .. } => ViewKind::Search,
        }
    }

    pub fn current_folder_id(&self) -> Option<FolderId> {
        match self {
            Self::Folder { folder_id }
            | Self::Topic { folder_id, .. }
            | Self::Lesson { folder_id, .. } => Some(*folder_id),
            Self::Dashboard | Self::Search { .. } => None,
        }
    }

    pub fn current_topic_id(&self) -> Option<TopicId> {
        match self {
            Self::Topic { topic_id, .. } | Self::Lesson { topic_id, .. } => Some(*topic_id),
            _ => None,
        }
    }

    pub fn current_lesson_id(&self) -> Option<LessonId> {
        match self {
            Self::Lesson { lesson_id, .. } => Some(*lesson_id),
            _ => None,
        }
    }

    pub fn search_query(&self) -> Option<&str> {
        match self {
            Self::Search { query } => Some(query),
            _ => None,
        }
    }

    pub fn preview_file_id(&self) -> Option<FileId> {
        match self {
            Self::Lesson {
                preview_file_id, ..
            } => *preview_file_id,
            _ => None,
        }
    }

    /// The same state with the preview closed.
    pub fn without_preview(&self) -> Self {
        match self {
            Self::Lesson {
                folder_id,
                topic_id,
                lesson_id,
                ..
            } => Self::Lesson {
                folder_id: *folder_id,
                topic_id: *topic_id,
                lesson_id: *lesson_id,
                preview_file_id: None,
            },
            other => other.clone(),
        }
    }

    /// One level up the hierarchy.
    pub fn parent(&self) -> Self {
        match self {
            Self::Dashboard | Self::Search { .. } | Self::Folder { .. } => Self::Dashboard,
            Self::Topic { folder_id, .. } => Self::Folder {
                folder_id: *folder_id,
            },
            Self::Lesson {
                folder_id,
                topic_id,
                ..
            } => Self::Topic {
                folder_id: *folder_id,
                topic_id: *topic_id,
            },
        }
    }

    /// Apply a single-field change.
    ///
    /// Precedence: a non-blank search query wins and clears everything
    /// else; a selected lesson beats a topic, which beats a folder.
    /// Clearing a level steps up to the nearest remaining ancestor. A
    /// preview can only be set for a file of the lesson being shown.
    pub fn apply(&self, change: StateChange, snapshot: &CacheSnapshot) -> AppResult<Self> {
        match change {
            StateChange::SearchQuery(query) => Ok(Self::search(&query)),
            StateChange::Lesson(Some(id)) => Self::lesson(snapshot, id),
            StateChange::Topic(Some(id)) => Self::topic(snapshot, id),
            StateChange::Folder(Some(id)) => Self::folder(snapshot, id),
            StateChange::Lesson(None) => Ok(match self {
                Self::Lesson { .. } => self.parent(),
                other => other.clone(),
            }),
            StateChange::Topic(None) => Ok(match self {
                Self::Lesson { folder_id, .. } | Self::Topic { folder_id, .. } => Self::Folder {
                    folder_id: *folder_id,
                },
                other => other.clone(),
            }),
            StateChange::Folder(None) => Ok(match self {
                Self::Search { .. } => self.clone(),
                _ => Self::Dashboard,
            }),
            StateChange::Preview(None) => Ok(self.without_preview()),
            StateChange::Preview(Some(file_id)) => {
                let Self::Lesson {
                    folder_id,
                    topic_id,
                    lesson_id,
                    ..
                } = self
                else {
                    return Err(AppError::validation(
                        "A file can only be previewed from its lesson",
                    ));
                };
                let file = snapshot
                    .file(file_id)
                    .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;
                if file.lesson_id != *lesson_id {
                    return Err(AppError::validation(format!(
                        "File {file_id} does not belong to lesson {lesson_id}"
                    )));
                }
                Ok(Self::Lesson {
                    folder_id: *folder_id,
                    topic_id: *topic_id,
                    lesson_id: *lesson_id,
                    preview_file_id: Some(file_id),
                })
            }
        }
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dashboard => write!(f, "dashboard"),
            Self::Folder { folder_id } => write!(f, "folder {folder_id}"),
            Self::Topic { topic_id, .. } => write!(f, "topic {topic_id}"),
            Self::Lesson {
                lesson_id,
                preview_file_id,
                ..
            } => match preview_file_id {
                Some(file_id) => write!(f, "lesson {lesson_id} (previewing file {file_id})"),
                None => write!(f, "lesson {lesson_id}"),
            },
            Self::Search { query } => write!(f, "search \"{query}\""),
        }
    }
}
