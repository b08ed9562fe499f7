//! Entity kinds of the four-level hierarchy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four record collections, from root to leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A folder (root of a branch).
    Folder,
    /// A topic inside a folder.
    Topic,
    /// A lesson inside a topic.
    Lesson,
    /// A file attached to a lesson.
    File,
}

impl EntityKind {
    /// Kind of the direct parent, `None` for folders.
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::Folder => None,
            Self::Topic => Some(Self::Folder),
            Self::Lesson => Some(Self::Topic),
            Self::File => Some(Self::Lesson),
        }
    }

    /// Kind of the direct children, `None` for files.
    pub fn child(self) -> Option<Self> {
        match self {
            Self::Folder => Some(Self::Topic),
            Self::Topic => Some(Self::Lesson),
            Self::Lesson => Some(Self::File),
            Self::File => None,
        }
    }

    /// Human-readable singular label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Topic => "topic",
            Self::Lesson => "lesson",
            Self::File => "file",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
