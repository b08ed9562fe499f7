//! Cascade delete engine.
//!
//! Removes a record together with every transitive descendant, deepest
//! first, one awaited step at a time. There is no transaction spanning
//! the steps: the first failure aborts the cascade and whatever was
//! already deleted stays deleted. Leftover orphans are invisible to
//! readers and can be removed with [`CascadeDeleter::purge_orphans`].

use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use tracing::{debug, info};

use studyhub_core::result::AppResult;
use studyhub_core::traits::{ChildRepository, Repository};
use studyhub_core::types::{EntityKind, FileId, FolderId, LessonId, TopicId};

use crate::repositories::{FileRepository, FolderRepository, LessonRepository, TopicRepository};

/// The root of a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CascadeTarget {
    Folder(FolderId),
    Topic(TopicId),
    Lesson(LessonId),
    File(FileId),
}

impl CascadeTarget {
    /// The kind of record being deleted.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Folder(_) => EntityKind::Folder,
            Self::Topic(_) => EntityKind::Topic,
            Self::Lesson(_) => EntityKind::Lesson,
            Self::File(_) => EntityKind::File,
        }
    }
}

impl fmt::Display for CascadeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder(id) => write!(f, "folder {id}"),
            Self::Topic(id) => write!(f, "topic {id}"),
            Self::Lesson(id) => write!(f, "lesson {id}"),
            Self::File(id) => write!(f, "file {id}"),
        }
    }
}

/// Records removed by a cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub folders: u64,
    pub topics: u64,
    pub lessons: u64,
    pub files: u64,
    /// Identifiers of removed files, in deletion order.
    pub deleted_files: Vec<FileId>,
}

impl CascadeReport {
    /// Total number of removed records.
    pub fn total(&self) -> u64 {
        self.folders + self.topics + self.lessons + self.files
    }

    /// Whether nothing was removed.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: CascadeReport) {
        self.folders += other.folders;
        self.topics += other.topics;
        self.lessons += other.lessons;
        self.files += other.files;
        self.deleted_files.extend(other.deleted_files);
    }
}

/// Deletes records bottom-up across the four collections.
#[derive(Debug, Clone)]
pub struct CascadeDeleter {
    folders: Arc<FolderRepository>,
    topics: Arc<TopicRepository>,
    lessons: Arc<LessonRepository>,
    files: Arc<FileRepository>,
}

impl CascadeDeleter {
    /// Create a new cascade engine over the given repositories.
    pub fn new(
        folders: Arc<FolderRepository>,
        topics: Arc<TopicRepository>,
        lessons: Arc<LessonRepository>,
        files: Arc<FileRepository>,
    ) -> Self {
        Self {
            folders,
            topics,
            lessons,
            files,
        }
    }

    /// Delete `target` and all of its descendants.
    ///
    /// Deleting a record that no longer exists is not an error; the
    /// returned report is simply empty.
    pub async fn run(&self, target: CascadeTarget) -> AppResult<CascadeReport> {
        let mut report = CascadeReport::default();
        self.delete(target, &mut report).await?;
        info!(
            target = %target,
            folders = report.folders,
            topics = report.topics,
            lessons = report.lessons,
            files = report.files,
            "Cascade delete completed"
        );
        Ok(report)
    }

    /// Recursive step. Children are deleted before their parent and
    /// `report` is updated as each record goes, so a caller still sees
    /// the partial result when a step fails.
    pub fn delete<'a>(
        &'a self,
        target: CascadeTarget,
        report: &'a mut CascadeReport,
    ) -> BoxFuture<'a, AppResult<()>> {
        async move {
            match target {
                CascadeTarget::Folder(id) => {
                    for topic in self.topics.list_by_parent(id).await? {
                        self.delete(CascadeTarget::Topic(topic.id), report).await?;
                    }
                    if self.folders.delete(id).await? {
                        report.folders += 1;
                    }
                }
                CascadeTarget::Topic(id) => {
                    for lesson in self.lessons.list_by_parent(id).await? {
                        self.delete(CascadeTarget::Lesson(lesson.id), report).await?;
                    }
                    if self.topics.delete(id).await? {
                        report.topics += 1;
                    }
                }
                CascadeTarget::Lesson(id) => {
                    for file in self.files.list_by_parent(id).await? {
                        self.delete(CascadeTarget::File(file.id), report).await?;
                    }
                    if self.lessons.delete(id).await? {
                        report.lessons += 1;
                    }
                }
                CascadeTarget::File(id) => {
                    if self.files.delete(id).await? {
                        report.files += 1;
                        report.deleted_files.push(id);
                    }
                }
            }
            debug!(target = %target, "Cascade step done");
            Ok(())
        }
        .boxed()
    }

    /// Remove records whose parent no longer resolves.
    ///
    /// Topics are purged first so their lessons and files go with them;
    /// lessons and files are looked up again afterwards.
    pub async fn purge_orphans(&self) -> AppResult<CascadeReport> {
        let mut report = CascadeReport::default();

        for id in self.topics.find_orphans().await? {
            self.delete(CascadeTarget::Topic(id), &mut report).await?;
        }
        for id in self.lessons.find_orphans().await? {
            self.delete(CascadeTarget::Lesson(id), &mut report).await?;
        }
        for id in self.files.find_orphans().await? {
            self.delete(CascadeTarget::File(id), &mut report).await?;
        }

        info!(
            topics = report.topics,
            lessons = report.lessons,
            files = report.files,
            "Orphan purge completed"
        );
        Ok(report)
    }
}
