//! Case-insensitive search across the live hierarchy.

use std::fmt;

use serde::Serialize;

use studyhub_cache::CacheSnapshot;

use crate::navigation::Navigation;

/// What a search hit points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchHitKind {
    Folder,
    Topic,
    Lesson,
    Link,
    File,
}

impl fmt::Display for SearchHitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Folder => "[folder]",
            Self::Topic => "[topic]",
            Self::Lesson => "[lesson]",
            Self::Link => "[link]",
            Self::File => "[file]",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub kind: SearchHitKind,
    pub title: String,
    /// Location in the hierarchy, e.g. `Spanish / Grammar`.
    pub breadcrumb: String,
    /// Where selecting the hit navigates to.
    pub target: Navigation,
}

/// Find folders, topics, lessons, links, and files matching `query`.
///
/// Hits come grouped by kind, each group in display order. Orphaned
/// records are never returned since the snapshot excludes them.
pub fn search(snapshot: &CacheSnapshot, query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let matches = |text: &str| text.to_lowercase().contains(&needle);
    let mut hits = Vec::new();

    for folder in snapshot.folders().iter().filter(|f| matches(&f.name)) {
        hits.push(SearchHit {
            kind: SearchHitKind::Folder,
            title: folder.name.clone(),
            breadcrumb: String::new(),
            target: Navigation::Folder {
                folder_id: folder.id,
            },
        });
    }

    for topic in snapshot.topics().iter().filter(|t| matches(&t.name)) {
        let Some(folder) = snapshot.folder(topic.folder_id) else {
            continue;
        };
        hits.push(SearchHit {
            kind: SearchHitKind::Topic,
            title: topic.name.clone(),
            breadcrumb: folder.name.clone(),
            target: Navigation::Topic {
                folder_id: folder.id,
                topic_id: topic.id,
            },
        });
    }

    for lesson in snapshot.lessons() {
        let Some((folder, topic, _)) = snapshot.lesson_ancestry(lesson.id) else {
            continue;
        };
        let target = Navigation::Lesson {
            folder_id: folder.id,
            topic_id: topic.id,
            lesson_id: lesson.id,
            preview_file_id: None,
        };
        let crumb = format!("{} / {}", folder.name, topic.name);

        let description_hit = lesson.description.as_deref().is_some_and(matches);
        if matches(&lesson.title) || description_hit {
            hits.push(SearchHit {
                kind: SearchHitKind::Lesson,
                title: lesson.title.clone(),
                breadcrumb: crumb.clone(),
                target: target.clone(),
            });
        }
        for link in lesson.links.iter().filter(|l| matches(&l.title)) {
            hits.push(SearchHit {
                kind: SearchHitKind::Link,
                title: link.title.clone(),
                breadcrumb: format!("{crumb} / {}", lesson.title),
                target: target.clone(),
            });
        }
    }

    for file in snapshot.files().iter().filter(|f| matches(&f.name)) {
        let Some((folder, topic, lesson)) = snapshot.lesson_ancestry(file.lesson_id) else {
            continue;
        };
        hits.push(SearchHit {
            kind: SearchHitKind::File,
            title: file.name.clone(),
            breadcrumb: format!("{} / {} / {}", folder.name, topic.name, lesson.title),
            target: Navigation::Lesson {
                folder_id: folder.id,
                topic_id: topic.id,
                lesson_id: lesson.id,
                preview_file_id: None,
            },
        });
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::test_fixture::snapshot;
    use studyhub_core::types::{LessonId, TopicId};

    #[test]
    fn test_case_insensitive() {
        let hits = search(&snapshot(), "GRAM");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, SearchHitKind::Topic);
        assert_eq!(hits[0].breadcrumb, "Spanish");
        assert_eq!(hits[0].target.current_topic_id(), Some(TopicId(1)));
    }

    #[test]
    fn test_matches_descriptions_links_and_files() {
        let snap = snapshot();

        let hits = search(&snap, "temporary");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, SearchHitKind::Lesson);
        assert_eq!(hits[0].target.current_lesson_id(), Some(LessonId(1)));

        let hits = search(&snap, "dictionary");
        assert_eq!(hits[0].kind, SearchHitKind::Link);
        assert_eq!(hits[0].breadcrumb, "Spanish / Grammar / Ser vs Estar");

        let hits = search(&snap, ".docx");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, SearchHitKind::File);
        assert_eq!(hits[0].target.current_lesson_id(), Some(LessonId(2)));
    }

    #[test]
    fn test_blank_query_has_no_hits() {
        assert!(search(&snapshot(), "  ").is_empty());
    }
}
