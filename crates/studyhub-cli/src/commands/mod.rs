//! CLI command definitions and dispatch.

pub mod file;
pub mod folder;
pub mod lesson;
pub mod link;
pub mod maintenance;
pub mod search;
pub mod topic;
pub mod view;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use studyhub_core::config::AppConfig;
use studyhub_core::error::AppError;
use studyhub_service::StudyHub;

/// StudyHub: folders, topics, lessons, and their documents
#[derive(Debug, Parser)]
#[command(name = "studyhub-cli", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file (defaults to config/default.toml + environment overlay)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Folder management
    Folder(folder::FolderArgs),
    /// Topic management
    Topic(topic::TopicArgs),
    /// Lesson management
    Lesson(lesson::LessonArgs),
    /// Lesson link management
    Link(link::LinkArgs),
    /// Lesson file management
    File(file::FileArgs),
    /// Render one view of the hierarchy
    View(view::ViewArgs),
    /// Search names, titles, descriptions, links, and files
    Search(search::SearchArgs),
    /// Store maintenance
    Maintenance(maintenance::MaintenanceArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let hub = open_hub(self.config.as_deref()).await?;
        let result = match &self.command {
            Commands::Folder(args) => folder::execute(args, &hub, self.format).await,
            Commands::Topic(args) => topic::execute(args, &hub, self.format).await,
            Commands::Lesson(args) => lesson::execute(args, &hub, self.format).await,
            Commands::Link(args) => link::execute(args, &hub, self.format).await,
            Commands::File(args) => file::execute(args, &hub, self.format).await,
            Commands::View(args) => view::execute(args, &hub, self.format),
            Commands::Search(args) => search::execute(args, &hub, self.format),
            Commands::Maintenance(args) => maintenance::execute(args, &hub, self.format).await,
        };
        hub.store().close().await;
        result
    }
}

/// Helper: load configuration from an explicit file or the environment
pub fn load_config(config_path: Option<&std::path::Path>) -> Result<AppConfig, AppError> {
    match config_path {
        Some(path) => AppConfig::load_from(path),
        None => {
            let env = std::env::var("STUDYHUB_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Helper: open the configured store behind a controller
pub async fn open_hub(config_path: Option<&std::path::Path>) -> Result<StudyHub, AppError> {
    let config = load_config(config_path)?;
    StudyHub::open(config).await
}

/// Render a timestamp for table rows
pub fn short_time(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
