//! Topic management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use studyhub_core::error::AppError;
use studyhub_core::types::{FolderId, TopicId};
use studyhub_service::{CreateTopicRequest, StudyHub, UpdateTopicRequest};

/// Arguments for topic commands
#[derive(Debug, Args)]
pub struct TopicArgs {
    /// Topic subcommand
    #[command(subcommand)]
    pub command: TopicCommand,
}

/// Topic subcommands
#[derive(Debug, Subcommand)]
pub enum TopicCommand {
    /// List the topics of a folder
    List {
        /// Folder ID
        #[arg(short, long)]
        folder: i64,
    },
    /// Create a topic at the end of a folder
    Create {
        /// Folder ID
        #[arg(short, long)]
        folder: i64,
        /// Topic name
        #[arg(short, long)]
        name: String,
    },
    /// Rename a topic
    Rename {
        /// Topic ID
        id: i64,
        /// New name
        #[arg(short, long)]
        name: String,
    },
    /// Delete a topic with its lessons and files
    Delete {
        /// Topic ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Set the display order of a folder's topics
    Reorder {
        /// Folder ID
        #[arg(short, long)]
        folder: i64,
        /// Topic IDs in the new order
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

/// Topic display row
#[derive(Debug, Serialize, Tabled)]
struct TopicRow {
    /// Topic ID
    id: i64,
    /// Name
    name: String,
    /// Lessons
    lessons: usize,
    /// Created at
    created_at: String,
}

/// Execute topic commands
pub async fn execute(args: &TopicArgs, hub: &StudyHub, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        TopicCommand::List { folder } => {
            let snapshot = hub.snapshot();
            let folder_id = FolderId::from_raw(*folder);
            if snapshot.folder(folder_id).is_none() {
                return Err(AppError::not_found(format!("Folder {folder_id} not found")));
            }
            let rows: Vec<TopicRow> = snapshot
                .topics_in(folder_id)
                .into_iter()
                .map(|t| TopicRow {
                    id: t.id.into_raw(),
                    name: t.name.clone(),
                    lessons: snapshot.lesson_count(t.id),
                    created_at: super::short_time(t.created_at),
                })
                .collect();
            output::print_list(&rows, format);
        }
        TopicCommand::Create { folder, name } => {
            let topic = hub
                .create_topic(CreateTopicRequest {
                    folder_id: FolderId::from_raw(*folder),
                    name: name.clone(),
                })
                .await?;
            output::print_success(&format!("Topic '{}' created (id: {})", topic.name, topic.id));
        }
        TopicCommand::Rename { id, name } => {
            let topic = hub
                .update_topic(TopicId::from_raw(*id), UpdateTopicRequest { name: name.clone() })
                .await?;
            output::print_success(&format!("Topic {} renamed to '{}'", topic.id, topic.name));
        }
        TopicCommand::Delete { id, force } => {
            let prompt = format!("Delete topic {id} with all its lessons and files?");
            if !output::confirm(&prompt, *force)? {
                return Ok(());
            }
            let report = hub.delete_topic(TopicId::from_raw(*id)).await?;
            if report.is_empty() {
                output::print_warning(&format!("Topic {id} was already gone"));
            } else {
                output::print_success(&format!(
                    "Deleted {} lesson(s), {} file(s)",
                    report.lessons, report.files
                ));
            }
        }
        TopicCommand::Reorder { folder, ids } => {
            let ids: Vec<TopicId> = ids.iter().copied().map(TopicId::from_raw).collect();
            let changed = hub.reorder_topics(FolderId::from_raw(*folder), &ids).await?;
            output::print_success(&format!("{changed} topic(s) moved"));
        }
    }

    Ok(())
}
