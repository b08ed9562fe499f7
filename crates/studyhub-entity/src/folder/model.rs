//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use studyhub_core::types::{FolderId, Ordered};

/// A folder, the root of one branch of study content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Accent colour as `#rrggbb`.
    pub color: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// Display position among folders (absent on legacy rows).
    #[sqlx(rename = "sort_order")]
    pub order: Option<i64>,
}

impl Folder {
    /// Colour used when none is chosen.
    pub const DEFAULT_COLOR: &'static str = "#4361ee";

    /// Check that a colour is a `#rrggbb` hex triplet.
    pub fn is_valid_color(color: &str) -> bool {
        color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl Ordered for Folder {
    fn display_order(&self) -> Option<i64> {
        self.order
    }

    fn sort_id(&self) -> i64 {
        self.id.0
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Accent colour.
    pub color: String,
    /// Display position.
    pub order: Option<i64>,
}
