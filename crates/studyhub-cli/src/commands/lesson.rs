//! Lesson management CLI commands.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use studyhub_core::error::AppError;
use studyhub_core::types::{LessonId, TopicId};
use studyhub_service::{CreateLessonRequest, StudyHub, UpdateLessonRequest};

/// Arguments for lesson commands
#[derive(Debug, Args)]
pub struct LessonArgs {
    /// Lesson subcommand
    #[command(subcommand)]
    pub command: LessonCommand,
}

/// Lesson subcommands
#[derive(Debug, Subcommand)]
pub enum LessonCommand {
    /// List the lessons of a topic
    List {
        /// Topic ID
        #[arg(short, long)]
        topic: i64,
    },
    /// Show one lesson with its links and files
    Show {
        /// Lesson ID
        id: i64,
    },
    /// Create a lesson at the end of a topic
    Create {
        /// Topic ID
        #[arg(short, long)]
        topic: i64,
        /// Lesson title
        #[arg(long)]
        title: String,
        /// Lesson date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Notes
        #[arg(long)]
        description: Option<String>,
    },
    /// Change a lesson
    Update {
        /// Lesson ID
        id: i64,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long, conflicts_with = "clear_date")]
        date: Option<NaiveDate>,
        /// Remove the date
        #[arg(long)]
        clear_date: bool,
        /// New notes
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the notes
        #[arg(long)]
        clear_description: bool,
    },
    /// Delete a lesson with its links and files
    Delete {
        /// Lesson ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Set the display order of a topic's lessons
    Reorder {
        /// Topic ID
        #[arg(short, long)]
        topic: i64,
        /// Lesson IDs in the new order
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

/// Lesson display row
#[derive(Debug, Serialize, Tabled)]
struct LessonRow {
    /// Lesson ID
    id: i64,
    /// Title
    title: String,
    /// Date
    date: String,
    /// Links
    links: usize,
    /// Files
    files: usize,
}

/// Execute lesson commands
pub async fn execute(args: &LessonArgs, hub: &StudyHub, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        LessonCommand::List { topic } => {
            let snapshot = hub.snapshot();
            let topic_id = TopicId::from_raw(*topic);
            if snapshot.topic(topic_id).is_none() {
                return Err(AppError::not_found(format!("Topic {topic_id} not found")));
            }
            let rows: Vec<LessonRow> = snapshot
                .lessons_in(topic_id)
                .into_iter()
                .map(|l| LessonRow {
                    id: l.id.into_raw(),
                    title: l.title.clone(),
                    date: l.date.map(|d| d.to_string()).unwrap_or_default(),
                    links: l.links.len(),
                    files: snapshot.file_count(l.id),
                })
                .collect();
            output::print_list(&rows, format);
        }
        LessonCommand::Show { id } => {
            hub.navigate_lesson(LessonId::from_raw(*id))?;
            let view = hub.current_view();
            output::print_item(&view, || view.to_string(), format);
        }
        LessonCommand::Create {
            topic,
            title,
            date,
            description,
        } => {
            let lesson = hub
                .create_lesson(CreateLessonRequest {
                    topic_id: TopicId::from_raw(*topic),
                    title: title.clone(),
                    date: *date,
                    description: description.clone(),
                })
                .await?;
            output::print_success(&format!("Lesson '{}' created (id: {})", lesson.title, lesson.id));
        }
        LessonCommand::Update {
            id,
            title,
            date,
            clear_date,
            description,
            clear_description,
        } => {
            let req = UpdateLessonRequest {
                title: title.clone(),
                date: if *clear_date { Some(None) } else { date.map(Some) },
                description: if *clear_description {
                    Some(None)
                } else {
                    description.clone().map(Some)
                },
            };
            let lesson = hub.update_lesson(LessonId::from_raw(*id), req).await?;
            output::print_success(&format!("Lesson {} saved", lesson.id));
            output::print_item(
                &lesson,
                || {
                    let date = lesson.date.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
                    format!("{} ({date})", lesson.title)
                },
                format,
            );
        }
        LessonCommand::Delete { id, force } => {
            let prompt = format!("Delete lesson {id} with its links and files?");
            if !output::confirm(&prompt, *force)? {
                return Ok(());
            }
            let report = hub.delete_lesson(LessonId::from_raw(*id)).await?;
            if report.is_empty() {
                output::print_warning(&format!("Lesson {id} was already gone"));
            } else {
                output::print_success(&format!("Lesson deleted with {} file(s)", report.files));
            }
        }
        LessonCommand::Reorder { topic, ids } => {
            let ids: Vec<LessonId> = ids.iter().copied().map(LessonId::from_raw).collect();
            let changed = hub.reorder_lessons(TopicId::from_raw(*topic), &ids).await?;
            output::print_success(&format!("{changed} lesson(s) moved"));
        }
    }

    Ok(())
}
