//! Lesson file CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use studyhub_core::error::AppError;
use studyhub_core::types::{FileId, LessonId};
use studyhub_service::{RenameFileRequest, StudyHub};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// List a lesson's files
    List {
        /// Lesson ID
        #[arg(short, long)]
        lesson: i64,
    },
    /// Upload PDF or Word documents to a lesson
    Upload {
        /// Lesson ID
        #[arg(short, long)]
        lesson: i64,
        /// Local files to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Save a file's content into a directory
    Download {
        /// File ID
        id: i64,
        /// Destination directory
        #[arg(short, long, default_value = ".")]
        dest: PathBuf,
    },
    /// Rename a file
    Rename {
        /// File ID
        id: i64,
        /// New name
        #[arg(short, long)]
        name: String,
    },
    /// Delete a file
    Delete {
        /// File ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// File ID
    id: i64,
    /// Name
    name: String,
    /// Type
    mime_type: String,
    /// Size in bytes
    size: i64,
    /// Uploaded at
    uploaded_at: String,
}

/// Execute file commands
pub async fn execute(args: &FileArgs, hub: &StudyHub, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        FileCommand::List { lesson } => {
            let lesson_id = LessonId::from_raw(*lesson);
            let snapshot = hub.snapshot();
            if snapshot.lesson(lesson_id).is_none() {
                return Err(AppError::not_found(format!("Lesson {lesson_id} not found")));
            }
            let rows: Vec<FileRow> = snapshot
                .files_in(lesson_id)
                .into_iter()
                .map(|f| FileRow {
                    id: f.id.into_raw(),
                    name: f.name.clone(),
                    mime_type: f.mime_type.clone(),
                    size: f.size_bytes,
                    uploaded_at: super::short_time(f.uploaded_at),
                })
                .collect();
            output::print_list(&rows, format);
        }
        FileCommand::Upload { lesson, paths } => {
            let lesson_id = LessonId::from_raw(*lesson);
            let mut failed = 0usize;
            for path in paths {
                match hub.upload_path(lesson_id, path).await {
                    Ok(file) => output::print_success(&format!(
                        "Uploaded '{}' (id: {}, {} bytes)",
                        file.name, file.id, file.size_bytes
                    )),
                    Err(e) => {
                        failed += 1;
                        output::print_error(&format!("{}: {}", path.display(), e.message));
                    }
                }
            }
            if failed > 0 {
                return Err(AppError::validation(format!(
                    "{failed} of {} file(s) were rejected",
                    paths.len()
                )));
            }
        }
        FileCommand::Download { id, dest } => {
            let path = hub.download_file(FileId::from_raw(*id), dest).await?;
            output::print_success(&format!("Saved to {}", path.display()));
        }
        FileCommand::Rename { id, name } => {
            let file = hub
                .rename_file(FileId::from_raw(*id), RenameFileRequest { name: name.clone() })
                .await?;
            output::print_success(&format!("File {} renamed to '{}'", file.id, file.name));
        }
        FileCommand::Delete { id, force } => {
            if !output::confirm(&format!("Delete file {id}?"), *force)? {
                return Ok(());
            }
            let report = hub.delete_file(FileId::from_raw(*id)).await?;
            if report.is_empty() {
                output::print_warning(&format!("File {id} was already gone"));
            } else {
                output::print_success("File deleted");
            }
        }
    }

    Ok(())
}
