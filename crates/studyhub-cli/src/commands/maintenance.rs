//! Store maintenance commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use studyhub_core::error::AppError;
use studyhub_service::StudyHub;

/// Arguments for the maintenance command
#[derive(Debug, Args)]
pub struct MaintenanceArgs {
    /// Maintenance subcommand
    #[command(subcommand)]
    pub command: MaintenanceCommand,
}

/// Maintenance subcommands
#[derive(Debug, Subcommand)]
pub enum MaintenanceCommand {
    /// Delete topics, lessons, and files whose parent no longer exists
    PurgeOrphans {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Show what the open-time schema upgrade changed
    Upgrade,
    /// Show record counts
    Stats,
}

/// Execute maintenance commands
pub async fn execute(
    args: &MaintenanceArgs,
    hub: &StudyHub,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        MaintenanceCommand::PurgeOrphans { force } => {
            if !output::confirm("Permanently delete orphaned records?", *force)? {
                return Ok(());
            }
            let report = hub.purge_orphans().await?;
            output::print_item(
                &report,
                || {
                    format!(
                        "Removed {} topic(s), {} lesson(s), {} file(s)",
                        report.topics, report.lessons, report.files
                    )
                },
                format,
            );
        }
        MaintenanceCommand::Upgrade => {
            // The upgrade itself runs whenever the store is opened.
            let report = hub.store().upgrade_report();
            if report.is_noop() && format == OutputFormat::Table {
                output::print_success("Schema is up to date");
                return Ok(());
            }
            output::print_item(
                report,
                || {
                    let mut lines = vec!["Schema upgraded:".to_string()];
                    lines.extend(
                        report
                            .added_order_columns
                            .iter()
                            .map(|t| format!("  added sort_order to {t}")),
                    );
                    lines.extend(report.rebuilt_indexes.iter().map(|i| format!("  rebuilt {i}")));
                    lines.extend(report.created_indexes.iter().map(|i| format!("  created {i}")));
                    lines.join("\n")
                },
                format,
            );
        }
        MaintenanceCommand::Stats => {
            let totals = hub.snapshot().totals();
            match format {
                OutputFormat::Json => output::print_item(&totals, String::new, format),
                OutputFormat::Table => {
                    output::print_kv("Folders", &totals.folders.to_string());
                    output::print_kv("Topics", &totals.topics.to_string());
                    output::print_kv("Lessons", &totals.lessons.to_string());
                    output::print_kv("Files", &totals.files.to_string());
                    output::print_kv("Stored bytes", &totals.bytes.to_string());
                }
            }
        }
    }

    Ok(())
}
