//! View models derived from the navigation state and a cache snapshot.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use studyhub_cache::{CacheSnapshot, Totals};
use studyhub_core::types::{FileId, FolderId, LessonId, TopicId};
use studyhub_entity::{File, Folder, Lesson, LessonLink, Topic};

use crate::navigation::{Navigation, ViewKind};
use crate::search::{SearchHit, search};

/// Number of recent lessons shown on the dashboard.
const RECENT_LESSONS: usize = 5;

/// The rendered view. Exactly one is active at a time.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Dashboard(DashboardView),
    Folder(FolderView),
    Topic(TopicView),
    Lesson(LessonView),
    Search(SearchView),
}

impl View {
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Dashboard(_) => ViewKind::Dashboard,
            Self::Folder(_) => ViewKind::Folder,
            Self::Topic(_) => ViewKind::Topic,
            Self::Lesson(_) => ViewKind::Lesson,
            Self::Search(_) => ViewKind::Search,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub folders: Vec<FolderCard>,
    pub recent_lessons: Vec<LessonRow>,
    pub totals: Totals,
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderCard {
    pub id: FolderId,
    pub name: String,
    pub color: String,
    pub topic_count: usize,
    pub lesson_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderView {
    pub folder: Folder,
    pub topics: Vec<TopicCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicCard {
    pub id: TopicId,
    pub name: String,
    pub lesson_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicView {
    pub folder: Folder,
    pub topic: Topic,
    pub lessons: Vec<LessonRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonRow {
    pub id: LessonId,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub file_count: usize,
    pub link_count: usize,
}

impl LessonRow {
    fn new(lesson: &Lesson, snapshot: &CacheSnapshot) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title.clone(),
            date: lesson.date,
            file_count: snapshot.file_count(lesson.id),
            link_count: lesson.links.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonView {
    pub folder: Folder,
    pub topic: Topic,
    pub lesson: Lesson,
    pub files: Vec<File>,
    pub preview: Option<File>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub query: String,
    pub hits: Vec<SearchHit>,
}

/// Derive the view for `nav` from `snapshot`.
///
/// A selection that does not resolve yields the dashboard rather than a
/// broken view.
pub fn derive_view(nav: &Navigation, snapshot: &CacheSnapshot) -> View {
    match nav {
        Navigation::Dashboard => View::Dashboard(dashboard(snapshot)),
        Navigation::Search { query } => View::Search(SearchView {
            query: query.clone(),
            hits: search(snapshot, query),
        }),
        Navigation::Folder { folder_id } => match snapshot.folder(*folder_id) {
            Some(folder) => View::Folder(FolderView {
                folder: folder.clone(),
                topics: snapshot
                    .topics_in(folder.id)
                    .into_iter()
                    .map(|t| TopicCard {
                        id: t.id,
                        name: t.name.clone(),
                        lesson_count: snapshot.lesson_count(t.id),
                    })
                    .collect(),
            }),
            None => View::Dashboard(dashboard(snapshot)),
        },
        Navigation::Topic { topic_id, .. } => {
            let resolved = snapshot
                .topic(*topic_id)
                .and_then(|t| snapshot.folder(t.folder_id).map(|f| (f, t)));
            match resolved {
                Some((folder, topic)) => View::Topic(TopicView {
                    folder: folder.clone(),
                    topic: topic.clone(),
                    lessons: snapshot
                        .lessons_in(topic.id)
                        .into_iter()
                        .map(|l| LessonRow::new(l, snapshot))
                        .collect(),
                }),
                None => View::Dashboard(dashboard(snapshot)),
            }
        }
        Navigation::Lesson {
            lesson_id,
            preview_file_id,
            ..
        } => match snapshot.lesson_ancestry(*lesson_id) {
            Some((folder, topic, lesson)) => View::Lesson(LessonView {
                folder: folder.clone(),
                topic: topic.clone(),
                lesson: lesson.clone(),
                files: snapshot
                    .files_in(lesson.id)
                    .into_iter()
                    .cloned()
                    .collect(),
                preview: preview_file_id
                    .and_then(|id| snapshot.file(id))
                    .filter(|f| f.lesson_id == lesson.id)
                    .cloned(),
            }),
            None => View::Dashboard(dashboard(snapshot)),
        },
    }
}

fn dashboard(snapshot: &CacheSnapshot) -> DashboardView {
    DashboardView {
        folders: snapshot
            .folders()
            .iter()
            .map(|f| FolderCard {
                id: f.id,
                name: f.name.clone(),
                color: f.color.clone(),
                topic_count: snapshot.topic_count(f.id),
                lesson_count: snapshot.lesson_count_in_folder(f.id),
            })
            .collect(),
        recent_lessons: snapshot
            .recent_lessons(RECENT_LESSONS)
            .into_iter()
            .map(|l| LessonRow::new(l, snapshot))
            .collect(),
        totals: snapshot.totals(),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn human_size(bytes: i64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes.max(0) as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < KIB * KIB {
        format!("{:.1} KB", b / KIB)
    } else {
        format!("{:.1} MB", b / (KIB * KIB))
    }
}

fn write_link(f: &mut fmt::Formatter<'_>, link: &LessonLink) -> fmt::Result {
    writeln!(f, "  - {} <{}>", link.title, link.url)
}

fn write_lesson_row(f: &mut fmt::Formatter<'_>, row: &LessonRow) -> fmt::Result {
    let date = row
        .date
        .map(|d| format!(" ({})", d.format("%Y-%m-%d")))
        .unwrap_or_default();
    writeln!(
        f,
        "  [{}] {}{} | {}, {}",
        row.id,
        row.title,
        date,
        plural(row.file_count, "file"),
        plural(row.link_count, "link")
    )
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dashboard(v) => {
                writeln!(f, "Dashboard")?;
                writeln!(
                    f,
                    "{}, {}, {}, {} ({})",
                    plural(v.totals.folders, "folder"),
                    plural(v.totals.topics, "topic"),
                    plural(v.totals.lessons, "lesson"),
                    plural(v.totals.files, "file"),
                    human_size(v.totals.bytes as i64)
                )?;
                if v.folders.is_empty() {
                    writeln!(f, "No folders yet.")?;
                }
                for card in &v.folders {
                    writeln!(
                        f,
                        "  [{}] {} {} | {}, {}",
                        card.id,
                        card.color,
                        card.name,
                        plural(card.topic_count, "topic"),
                        plural(card.lesson_count, "lesson")
                    )?;
                }
                if !v.recent_lessons.is_empty() {
                    writeln!(f, "Recent lessons:")?;
                    for row in &v.recent_lessons {
                        write_lesson_row(f, row)?;
                    }
                }
                Ok(())
            }
            Self::Folder(v) => {
                writeln!(f, "{}", v.folder.name)?;
                if v.topics.is_empty() {
                    writeln!(f, "No topics yet.")?;
                }
                for card in &v.topics {
                    writeln!(
                        f,
                        "  [{}] {} | {}",
                        card.id,
                        card.name,
                        plural(card.lesson_count, "lesson")
                    )?;
                }
                Ok(())
            }
            Self::Topic(v) => {
                writeln!(f, "{} / {}", v.folder.name, v.topic.name)?;
                if v.lessons.is_empty() {
                    writeln!(f, "No lessons yet.")?;
                }
                for row in &v.lessons {
                    write_lesson_row(f, row)?;
                }
                Ok(())
            }
            Self::Lesson(v) => {
                writeln!(
                    f,
                    "{} / {} / {}",
                    v.folder.name, v.topic.name, v.lesson.title
                )?;
                if let Some(date) = v.lesson.date {
                    writeln!(f, "Date: {}", date.format("%Y-%m-%d"))?;
                }
                if let Some(description) = v.lesson.description.as_deref() {
                    writeln!(f, "{description}")?;
                }
                writeln!(f, "Files ({}):", v.files.len())?;
                for file in &v.files {
                    let marker = if v.preview.as_ref().is_some_and(|p| p.id == file.id) {
                        "*"
                    } else {
                        " "
                    };
                    writeln!(
                        f,
                        " {marker}[{}] {} ({})",
                        file.id,
                        file.name,
                        human_size(file.size_bytes)
                    )?;
                }
                writeln!(f, "Links ({}):", v.lesson.links.len())?;
                for link in &v.lesson.links {
                    write_link(f, link)?;
                }
                if let Some(preview) = &v.preview {
                    writeln!(f, "Previewing: {}", preview.name)?;
                }
                Ok(())
            }
            Self::Search(v) => {
                writeln!(
                    f,
                    "Search \"{}\": {}",
                    v.query,
                    plural(v.hits.len(), "result")
                )?;
                for hit in &v.hits {
                    writeln!(f, "  {} {} ({})", hit.kind, hit.title, hit.breadcrumb)?;
                }
                Ok(())
            }
        }
    }
}

/// Identifier of the file a view is previewing, if any.
pub fn previewed_file(view: &View) -> Option<FileId> {
    match view {
        View::Lesson(v) => v.preview.as_ref().map(|f| f.id),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::test_fixture::{snapshot, snapshot_without};
    use super::*;

    #[test]
    fn test_dashboard_counts() {
        let view = derive_view(&Navigation::Dashboard, &snapshot());
        let View::Dashboard(dash) = &view else {
            panic!("expected dashboard, got {:?}", view.kind());
        };
        assert_eq!(dash.folders.len(), 2);
        assert_eq!(dash.folders[0].name, "Spanish");
        assert_eq!(dash.folders[0].topic_count, 2);
        assert_eq!(dash.folders[0].lesson_count, 2);
        assert_eq!(dash.recent_lessons[0].title, "Epsilon-delta");
        assert!(view.to_string().contains("2 folders"));
    }

    #[test]
    fn test_empty_dashboard() {
        let view = derive_view(&Navigation::Dashboard, &CacheSnapshot::default());
        let View::Dashboard(dash) = &view else {
            panic!("expected dashboard");
        };
        assert!(dash.folders.is_empty());
        assert!(view.to_string().contains("No folders yet."));
    }

    #[test]
    fn test_topic_view_lists_lessons_in_order() {
        let snap = snapshot();
        let nav = Navigation::topic(&snap, TopicId(1)).unwrap();
        let View::Topic(topic) = derive_view(&nav, &snap) else {
            panic!("expected topic view");
        };
        let titles: Vec<&str> = topic.lessons.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Ser vs Estar", "Preterite"]);
        assert_eq!(topic.lessons[0].file_count, 1);
        assert_eq!(topic.lessons[0].link_count, 1);
    }

    #[test]
    fn test_lesson_view_with_preview() {
        let snap = snapshot();
        let nav = Navigation::Lesson {
            folder_id: FolderId(1),
            topic_id: TopicId(1),
            lesson_id: LessonId(1),
            preview_file_id: Some(FileId(1)),
        };
        let view = derive_view(&nav, &snap);
        assert_eq!(previewed_file(&view), Some(FileId(1)));
        let text = view.to_string();
        assert!(text.contains("Spanish / Grammar / Ser vs Estar"));
        assert!(text.contains("Previewing: rules.pdf"));
        assert!(text.contains("2.0 KB"));
    }

    #[test]
    fn test_unresolved_selection_renders_dashboard() {
        let snap = snapshot_without(Some(FolderId(1)), None);
        let nav = Navigation::Lesson {
            folder_id: FolderId(1),
            topic_id: TopicId(1),
            lesson_id: LessonId(1),
            preview_file_id: None,
        };
        assert_eq!(derive_view(&nav, &snap).kind(), ViewKind::Dashboard);
    }

    #[test]
    fn test_search_view() {
        let snap = snapshot();
        let view = derive_view(&Navigation::search("gram"), &snap);
        let View::Search(search) = &view else {
            panic!("expected search view");
        };
        assert_eq!(search.hits.len(), 1);
        assert_eq!(search.hits[0].title, "Grammar");
    }
}
