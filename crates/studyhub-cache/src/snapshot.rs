//! Immutable projection of the four collections.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use studyhub_core::types::{FileId, FolderId, LessonId, TopicId, sort_ordered};
use studyhub_entity::{File, Folder, Lesson, Topic};

/// Collection sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub folders: usize,
    pub topics: usize,
    pub lessons: usize,
    pub files: usize,
    pub bytes: u64,
}

/// A consistent, sorted, orphan-free view of the store.
///
/// Built once per reload and never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    generation: u64,
    loaded_at: Option<DateTime<Utc>>,

    folders: Vec<Folder>,
    topics: Vec<Topic>,
    lessons: Vec<Lesson>,
    files: Vec<File>,

    folder_pos: HashMap<FolderId, usize>,
    topic_pos: HashMap<TopicId, usize>,
    lesson_pos: HashMap<LessonId, usize>,
    file_pos: HashMap<FileId, usize>,

    topics_per_folder: HashMap<FolderId, usize>,
    lessons_per_topic: HashMap<TopicId, usize>,
    files_per_lesson: HashMap<LessonId, usize>,
}

impl CacheSnapshot {
    /// Derive a snapshot from full collection reads.
    ///
    /// Records whose ancestor chain does not resolve are dropped, then
    /// every collection is put in display order.
    pub fn build(
        generation: u64,
        mut folders: Vec<Folder>,
        topics: Vec<Topic>,
        lessons: Vec<Lesson>,
        files: Vec<File>,
    ) -> Self {
        let live_folders: HashSet<FolderId> = folders.iter().map(|f| f.id).collect();
        let mut topics: Vec<Topic> = topics
            .into_iter()
            .filter(|t| live_folders.contains(&t.folder_id))
            .collect();
        let live_topics: HashSet<TopicId> = topics.iter().map(|t| t.id).collect();
        let mut lessons: Vec<Lesson> = lessons
            .into_iter()
            .filter(|l| live_topics.contains(&l.topic_id))
            .collect();
        let live_lessons: HashSet<LessonId> = lessons.iter().map(|l| l.id).collect();
        let mut files: Vec<File> = files
            .into_iter()
            .filter(|f| live_lessons.contains(&f.lesson_id))
            .collect();

        sort_ordered(&mut folders);
        sort_ordered(&mut topics);
        sort_ordered(&mut lessons);
        sort_ordered(&mut files);

        let topics_per_folder = frequency(topics.iter().map(|t| t.folder_id));
        let lessons_per_topic = frequency(lessons.iter().map(|l| l.topic_id));
        let files_per_lesson = frequency(files.iter().map(|f| f.lesson_id));

        Self {
            generation,
            loaded_at: Some(Utc::now()),
            folder_pos: positions(folders.iter().map(|f| f.id)),
            topic_pos: positions(topics.iter().map(|t| t.id)),
            lesson_pos: positions(lessons.iter().map(|l| l.id)),
            file_pos: positions(files.iter().map(|f| f.id)),
            folders,
            topics,
            lessons,
            files,
            topics_per_folder,
            lessons_per_topic,
            files_per_lesson,
        }
    }

    /// Reload counter; 0 for the empty snapshot present before the
    /// first reload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// When this snapshot was built.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn files(&self) -> &[File] {
        &self.files
    }

    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folder_pos.get(&id).map(|&i| &self.folders[i])
    }

    pub fn topic(&self, id: TopicId) -> Option<&Topic> {
        self.topic_pos.get(&id).map(|&i| &self.topics[i])
    }

    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.lesson_pos.get(&id).map(|&i| &self.lessons[i])
    }

    pub fn file(&self, id: FileId) -> Option<&File> {
        self.file_pos.get(&id).map(|&i| &self.files[i])
    }

    /// Topics of a folder in display order.
    pub fn topics_in(&self, folder_id: FolderId) -> Vec<&Topic> {
        self.topics
            .iter()
            .filter(|t| t.folder_id == folder_id)
            .collect()
    }

    /// Lessons of a topic in display order.
    pub fn lessons_in(&self, topic_id: TopicId) -> Vec<&Lesson> {
        self.lessons
            .iter()
            .filter(|l| l.topic_id == topic_id)
            .collect()
    }

    /// Files of a lesson in display order.
    pub fn files_in(&self, lesson_id: LessonId) -> Vec<&File> {
        self.files
            .iter()
            .filter(|f| f.lesson_id == lesson_id)
            .collect()
    }

    pub fn topic_count(&self, folder_id: FolderId) -> usize {
        self.topics_per_folder.get(&folder_id).copied().unwrap_or(0)
    }

    pub fn lesson_count(&self, topic_id: TopicId) -> usize {
        self.lessons_per_topic.get(&topic_id).copied().unwrap_or(0)
    }

    pub fn file_count(&self, lesson_id: LessonId) -> usize {
        self.files_per_lesson.get(&lesson_id).copied().unwrap_or(0)
    }

    /// Lessons across all topics of a folder.
    pub fn lesson_count_in_folder(&self, folder_id: FolderId) -> usize {
        self.topics_in(folder_id)
            .into_iter()
            .map(|t| self.lesson_count(t.id))
            .sum()
    }

    /// Folder and topic that own a live lesson.
    pub fn lesson_ancestry(&self, lesson_id: LessonId) -> Option<(&Folder, &Topic, &Lesson)> {
        let lesson = self.lesson(lesson_id)?;
        let topic = self.topic(lesson.topic_id)?;
        let folder = self.folder(topic.folder_id)?;
        Some((folder, topic, lesson))
    }

    /// Collection sizes and stored payload volume.
    pub fn totals(&self) -> Totals {
        Totals {
            folders: self.folders.len(),
            topics: self.topics.len(),
            lessons: self.lessons.len(),
            files: self.files.len(),
            bytes: self
                .files
                .iter()
                .map(|f| f.size_bytes.max(0) as u64)
                .sum(),
        }
    }

    /// The most recently created lessons, newest first.
    pub fn recent_lessons(&self, limit: usize) -> Vec<&Lesson> {
        let mut lessons: Vec<&Lesson> = self.lessons.iter().collect();
        lessons.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        lessons.truncate(limit);
        lessons
    }
}

fn frequency<K, I>(keys: I) -> HashMap<K, usize>
where
    K: std::hash::Hash + Eq,
    I: IntoIterator<Item = K>,
{
    let mut counts = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

fn positions<K, I>(ids: I) -> HashMap<K, usize>
where
    K: std::hash::Hash + Eq,
    I: IntoIterator<Item = K>,
{
    ids.into_iter().enumerate().map(|(i, id)| (id, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use studyhub_entity::ContentType;

    fn folder(id: i64, order: Option<i64>) -> Folder {
        Folder {
            id: FolderId(id),
            name: format!("F{id}"),
            color: Folder::DEFAULT_COLOR.to_string(),
            created_at: Utc::now(),
            order,
        }
    }

    fn topic(id: i64, folder_id: i64, order: Option<i64>) -> Topic {
        Topic {
            id: TopicId(id),
            folder_id: FolderId(folder_id),
            name: format!("T{id}"),
            created_at: Utc::now(),
            order,
        }
    }

    fn lesson(id: i64, topic_id: i64) -> Lesson {
        Lesson {
            id: LessonId(id),
            topic_id: TopicId(topic_id),
            title: format!("L{id}"),
            date: None,
            description: None,
            order: Some(0),
            created_at: Utc::now(),
            links: Vec::new(),
        }
    }

    fn file(id: i64, lesson_id: i64) -> File {
        File {
            id: FileId(id),
            lesson_id: LessonId(lesson_id),
            name: format!("f{id}.pdf"),
            mime_type: ContentType::Pdf.mime().to_string(),
            size_bytes: 100,
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_orphans_are_excluded() {
        let snapshot = CacheSnapshot::build(
            1,
            vec![folder(1, Some(0))],
            vec![topic(1, 1, Some(0)), topic(2, 9, Some(0))],
            vec![lesson(1, 1), lesson(2, 2)],
            vec![file(1, 1), file(2, 2), file(3, 77)],
        );

        assert!(snapshot.topic(TopicId(2)).is_none());
        assert!(snapshot.lesson(LessonId(2)).is_none());
        assert!(snapshot.file(FileId(2)).is_none());
        assert!(snapshot.file(FileId(3)).is_none());
        assert_eq!(
            snapshot.totals(),
            Totals {
                folders: 1,
                topics: 1,
                lessons: 1,
                files: 1,
                bytes: 100
            }
        );
    }

    #[test]
    fn test_sorted_by_order_then_id() {
        let snapshot = CacheSnapshot::build(
            1,
            vec![folder(3, Some(0)), folder(1, Some(2)), folder(2, Some(0)), folder(4, None)],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        let ids: Vec<i64> = snapshot.folders().iter().map(|f| f.id.0).collect();
        // Folder 4 has no order and sorts by its id.
        assert_eq!(ids, vec![2, 3, 1, 4]);
        assert_eq!(snapshot.folder(FolderId(1)).map(|f| f.id), Some(FolderId(1)));
    }

    #[test]
    fn test_counts_default_to_zero() {
        let snapshot = CacheSnapshot::build(
            1,
            vec![folder(1, Some(0)), folder(2, Some(1))],
            vec![topic(1, 1, Some(1)), topic(2, 1, Some(0))],
            vec![lesson(1, 1), lesson(2, 1), lesson(3, 2)],
            vec![file(1, 3)],
        );

        assert_eq!(snapshot.topic_count(FolderId(1)), 2);
        assert_eq!(snapshot.topic_count(FolderId(2)), 0);
        assert_eq!(snapshot.lesson_count(TopicId(1)), 2);
        assert_eq!(snapshot.file_count(LessonId(3)), 1);
        assert_eq!(snapshot.file_count(LessonId(1)), 0);
        assert_eq!(snapshot.lesson_count_in_folder(FolderId(1)), 3);

        let topic_ids: Vec<TopicId> = snapshot
            .topics_in(FolderId(1))
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(topic_ids, vec![TopicId(2), TopicId(1)]);

        let (f, t, l) = snapshot.lesson_ancestry(LessonId(3)).unwrap();
        assert_eq!((f.id, t.id, l.id), (FolderId(1), TopicId(2), LessonId(3)));
    }
}
