//! Search command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use studyhub_core::error::AppError;
use studyhub_service::StudyHub;
use studyhub_view::search;

/// Arguments for the search command
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text to look for (case-insensitive)
    pub query: String,
}

/// Search hit display row
#[derive(Debug, Serialize, Tabled)]
struct HitRow {
    /// Kind
    kind: String,
    /// Title
    title: String,
    /// Location
    location: String,
}

/// Execute the search command
pub fn execute(args: &SearchArgs, hub: &StudyHub, format: OutputFormat) -> Result<(), AppError> {
    let rows: Vec<HitRow> = search(&hub.snapshot(), &args.query)
        .into_iter()
        .map(|hit| HitRow {
            kind: hit.kind.to_string(),
            title: hit.title,
            location: hit.breadcrumb,
        })
        .collect();
    output::print_list(&rows, format);
    Ok(())
}
