//! File ingestion configuration.

use serde::{Deserialize, Serialize};

/// Limits applied when lesson attachments are uploaded.
///
/// The content-type allow-list itself is fixed and not configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Largest accepted payload in bytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_bytes: u64,
    /// Maximum number of files accepted in one batch upload.
    #[serde(default = "default_max_batch_files")]
    pub max_batch_files: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_upload_size_bytes: default_max_upload_size(),
            max_batch_files: default_max_batch_files(),
        }
    }
}

fn default_max_upload_size() -> u64 {
    50 * 1024 * 1024
}

fn default_max_batch_files() -> usize {
    20
}
