//! Lesson link CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use studyhub_core::error::AppError;
use studyhub_core::types::{LessonId, LinkId};
use studyhub_service::{AddLinkRequest, StudyHub};

/// Arguments for link commands
#[derive(Debug, Args)]
pub struct LinkArgs {
    /// Link subcommand
    #[command(subcommand)]
    pub command: LinkCommand,
}

/// Link subcommands
#[derive(Debug, Subcommand)]
pub enum LinkCommand {
    /// List a lesson's links
    List {
        /// Lesson ID
        #[arg(short, long)]
        lesson: i64,
    },
    /// Attach a link to a lesson
    Add {
        /// Lesson ID
        #[arg(short, long)]
        lesson: i64,
        /// Link title
        #[arg(short, long)]
        title: String,
        /// http(s) URL
        #[arg(short, long)]
        url: String,
    },
    /// Remove a link from a lesson
    Remove {
        /// Lesson ID
        #[arg(short, long)]
        lesson: i64,
        /// Link ID
        link: String,
    },
}

/// Link display row
#[derive(Debug, Serialize, Tabled)]
struct LinkRow {
    /// Link ID
    id: String,
    /// Title
    title: String,
    /// URL
    url: String,
    /// Added at
    added_at: String,
}

/// Execute link commands
pub async fn execute(args: &LinkArgs, hub: &StudyHub, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        LinkCommand::List { lesson } => {
            let lesson_id = LessonId::from_raw(*lesson);
            let snapshot = hub.snapshot();
            let lesson = snapshot
                .lesson(lesson_id)
                .ok_or_else(|| AppError::not_found(format!("Lesson {lesson_id} not found")))?;
            let rows: Vec<LinkRow> = lesson
                .links
                .iter()
                .map(|l| LinkRow {
                    id: l.id.to_string(),
                    title: l.title.clone(),
                    url: l.url.clone(),
                    added_at: super::short_time(l.added_at),
                })
                .collect();
            output::print_list(&rows, format);
        }
        LinkCommand::Add { lesson, title, url } => {
            let link = hub
                .add_link(
                    LessonId::from_raw(*lesson),
                    AddLinkRequest {
                        title: title.clone(),
                        url: url.clone(),
                    },
                )
                .await?;
            output::print_success(&format!("Link '{}' added (id: {})", link.title, link.id));
        }
        LinkCommand::Remove { lesson, link } => {
            let link_id: LinkId = link
                .parse()
                .map_err(|e| AppError::validation(format!("Invalid link ID '{link}': {e}")))?;
            if hub.remove_link(LessonId::from_raw(*lesson), link_id).await? {
                output::print_success("Link removed");
            } else {
                output::print_warning("Link was already gone");
            }
        }
    }

    Ok(())
}
