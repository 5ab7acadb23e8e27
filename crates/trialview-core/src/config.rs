//! Panel configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings shared by every trial panel on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Base address of the backend REST API (e.g. `/api/v1/nni`).
    pub backend_base: String,
    /// Path of the bundled model viewer page.
    pub model_viewer_path: String,
    /// How long the copy status message stays visible.
    pub message_timeout_ms: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            backend_base: "/api/v1/nni".to_string(),
            model_viewer_path: "/netron/index.html".to_string(),
            message_timeout_ms: 2000,
        }
    }
}

impl PanelConfig {
    pub fn message_timeout(&self) -> Duration {
        Duration::from_millis(self.message_timeout_ms)
    }

    pub fn from_json(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
