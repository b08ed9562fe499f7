//! Render one view of the hierarchy.

use clap::Args;

use crate::output::{self, OutputFormat};
use studyhub_core::error::AppError;
use studyhub_core::types::{FolderId, LessonId, TopicId};
use studyhub_service::StudyHub;

/// Which view to render; the dashboard when nothing is selected
#[derive(Debug, Args)]
#[group(multiple = false)]
pub struct ViewArgs {
    /// Folder ID
    #[arg(long)]
    pub folder: Option<i64>,
    /// Topic ID
    #[arg(long)]
    pub topic: Option<i64>,
    /// Lesson ID
    #[arg(long)]
    pub lesson: Option<i64>,
}

/// Execute the view command
pub fn execute(args: &ViewArgs, hub: &StudyHub, format: OutputFormat) -> Result<(), AppError> {
    if let Some(id) = args.lesson {
        hub.navigate_lesson(LessonId::from_raw(id))?;
    } else if let Some(id) = args.topic {
        hub.navigate_topic(TopicId::from_raw(id))?;
    } else if let Some(id) = args.folder {
        hub.navigate_folder(FolderId::from_raw(id))?;
    } else {
        hub.navigate_dashboard();
    }

    let view = hub.current_view();
    output::print_item(&view, || view.to_string(), format);
    Ok(())
}
