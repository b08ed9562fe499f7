//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use studyhub_core::error::AppError;
use studyhub_core::types::FolderId;
use studyhub_entity::folder::Folder;
use studyhub_service::{CreateFolderRequest, StudyHub, UpdateFolderRequest};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List folders in display order
    List,
    /// Create a new folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Colour as #rrggbb
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Rename or recolour a folder
    Update {
        /// Folder ID
        id: i64,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New colour as #rrggbb
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Delete a folder with everything inside it
    Delete {
        /// Folder ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Set the display order of all folders
    Reorder {
        /// Folder IDs in the new order
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: i64,
    /// Name
    name: String,
    /// Colour
    color: String,
    /// Topics
    topics: usize,
    /// Lessons
    lessons: usize,
    /// Created at
    created_at: String,
}

fn print_folder(folder: &Folder, format: OutputFormat) {
    output::print_item(
        folder,
        || format!("{} (id: {}, colour: {})", folder.name, folder.id, folder.color),
        format,
    );
}

/// Execute folder commands
pub async fn execute(args: &FolderArgs, hub: &StudyHub, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        FolderCommand::List => {
            let snapshot = hub.snapshot();
            let rows: Vec<FolderRow> = snapshot
                .folders()
                .iter()
                .map(|f| FolderRow {
                    id: f.id.into_raw(),
                    name: f.name.clone(),
                    color: f.color.clone(),
                    topics: snapshot.topic_count(f.id),
                    lessons: snapshot.lesson_count_in_folder(f.id),
                    created_at: super::short_time(f.created_at),
                })
                .collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Create { name, color } => {
            let folder = hub
                .create_folder(CreateFolderRequest {
                    name: name.clone(),
                    color: color.clone(),
                })
                .await?;
            output::print_success(&format!("Folder '{}' created (id: {})", folder.name, folder.id));
            print_folder(&folder, format);
        }
        FolderCommand::Update { id, name, color } => {
            let folder = hub
                .update_folder(
                    FolderId::from_raw(*id),
                    UpdateFolderRequest {
                        name: name.clone(),
                        color: color.clone(),
                    },
                )
                .await?;
            output::print_success(&format!("Folder {} saved", folder.id));
            print_folder(&folder, format);
        }
        FolderCommand::Delete { id, force } => {
            let folder_id = FolderId::from_raw(*id);
            let name = hub
                .snapshot()
                .folder(folder_id)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| format!("#{id}"));
            let prompt = format!("Delete folder '{name}' with all its topics, lessons, and files?");
            if !output::confirm(&prompt, *force)? {
                return Ok(());
            }

            let report = hub.delete_folder(folder_id).await?;
            if report.is_empty() {
                output::print_warning(&format!("Folder {id} was already gone"));
            } else {
                output::print_success(&format!(
                    "Deleted {} topic(s), {} lesson(s), {} file(s)",
                    report.topics, report.lessons, report.files
                ));
            }
        }
        FolderCommand::Reorder { ids } => {
            let ids: Vec<FolderId> = ids.iter().copied().map(FolderId::from_raw).collect();
            let changed = hub.reorder_folders(&ids).await?;
            output::print_success(&format!("{changed} folder(s) moved"));
        }
    }

    Ok(())
}
