//! URLs opened by the trial panel.
//!
//! These shapes are shared with the backend `trial-file` route and the bundled
//! model viewer; changing one side means changing the other.

use crate::config::PanelConfig;
use crate::models::TrackingDashboard;

/// File name of the exported model served for visualization.
pub const MODEL_FILE: &str = "model.onnx";

/// Builds links for one trial.
#[derive(Debug, Clone, Copy)]
pub struct TrialLinks<'a> {
    config: &'a PanelConfig,
    trial_id: &'a str,
}

impl<'a> TrialLinks<'a> {
    pub fn new(config: &'a PanelConfig, trial_id: &'a str) -> Self {
        Self { config, trial_id }
    }

    /// `<backend-base>/trial-file/<trialId>/<filename>`
    pub fn trial_file(&self, filename: &str) -> String {
        format!(
            "{}/trial-file/{}/{}",
            self.config.backend_base, self.trial_id, filename
        )
    }

    /// Model viewer page pointed at the trial's exported model.
    pub fn model_viewer(&self) -> String {
        format!(
            "{}?url={}",
            self.config.model_viewer_path,
            self.trial_file(MODEL_FILE)
        )
    }

    /// Run page on the tracking dashboard, e.g. `<link>/runs/007-<trialId><queries>`.
    pub fn tracking_run(&self, dashboard: &TrackingDashboard, sequence_id: u32) -> String {
        format!(
            "{}/runs/{:03}-{}{}",
            dashboard.link, sequence_id, self.trial_id, dashboard.queries
        )
    }
}
