//! Transient notification configuration.

use serde::{Deserialize, Serialize};

/// Settings for the auto-dismissing notifications shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// How long a notification stays visible, in seconds.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// Maximum number of notifications visible at once.
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            max_visible: default_max_visible(),
        }
    }
}

fn default_ttl() -> u64 {
    4
}

fn default_max_visible() -> usize {
    5
}
