//! View model of the trial detail panel.
//!
//! [`TrialPanel::build`] decides everything the panel shows for one trial:
//! which tabs exist, the parameter tree, which log buttons appear and where
//! each of them points. The frontend only renders it.

use serde_json::Value;
use tracing::debug;

use crate::clipboard::Clipboard;
use crate::config::PanelConfig;
use crate::error::{Result, TrialViewError};
use crate::links::TrialLinks;
use crate::message::StatusMessage;
use crate::models::{ExperimentContext, Platform, Trial, TrialLookup};
use crate::params::{self, TreeNode};

pub const PARAMETERS_UNAVAILABLE: &str = "This trial's parameters are not available.";
pub const LOG_PATH_UNAVAILABLE: &str = "This trial's log path is not available.";
pub const COPY_SUCCEEDED: &str = "Successfully copy parameters to clipboard in form of python dict !";
pub const COPY_FAILED: &str = "Failed !";
pub const ORIGINAL_PARAMETERS_TITLE: &str = "Retiarii parameters";
pub const VISUALIZATION_TEXT: &str = "Visualize models with 3rd-party tools.";

/// Experiment tag that marks architecture-search experiments.
pub const ARCHITECTURE_SEARCH_TAG: &str = "retiarii";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Parameters,
    Log,
    Visualization,
}

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Tab::Parameters => "Parameters",
            Tab::Log => "Log",
            Tab::Visualization => "Visualization",
        }
    }
}

/// A button that opens `url` in a new browser tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkButton {
    pub label: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrialPanel {
    pub trial_id: String,
    pub parameters: ParameterView,
    pub log: LogView,
    pub visualization: Option<VisualizationView>,
}

impl TrialPanel {
    pub fn build(trial: &Trial, experiment: &ExperimentContext, config: &PanelConfig) -> Self {
        let links = TrialLinks::new(config, &trial.id);
        let panel = Self {
            trial_id: trial.id.clone(),
            parameters: ParameterView::new(trial.hyper_parameters.as_ref()),
            log: LogView::new(trial, experiment, &links),
            visualization: VisualizationView::new(experiment, &links),
        };
        debug!(
            trial = %trial.id,
            platform = %experiment.platform,
            tabs = panel.tabs().len(),
            "built trial panel"
        );
        panel
    }

    /// Build the panel for the trial with the given id.
    pub fn for_trial(
        trials: &impl TrialLookup,
        trial_id: &str,
        experiment: &ExperimentContext,
        config: &PanelConfig,
    ) -> Result<Self> {
        let trial = trials
            .trial(trial_id)
            .ok_or_else(|| TrialViewError::TrialNotFound(trial_id.to_string()))?;
        Ok(Self::build(trial, experiment, config))
    }

    pub fn tabs(&self) -> Vec<Tab> {
        let mut tabs = vec![Tab::Parameters, Tab::Log];
        if self.visualization.is_some() {
            tabs.push(Tab::Visualization);
        }
        tabs
    }
}

// ─── Parameters ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterView {
    Available(ParameterDetails),
    Unavailable { message: &'static str },
}

impl ParameterView {
    fn new(raw: Option<&Value>) -> Self {
        match raw {
            Some(raw) => ParameterView::Available(ParameterDetails::new(raw.clone())),
            None => ParameterView::Unavailable {
                message: PARAMETERS_UNAVAILABLE,
            },
        }
    }
}

/// A code panel with a title, as shown by "Original parameters".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPanel {
    pub title: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDetails {
    raw: Value,
    tree: Vec<TreeNode>,
}

impl ParameterDetails {
    pub fn new(raw: Value) -> Self {
        let tree = params::flatten_tree(&params::reformat_parameters(&raw));
        Self { raw, tree }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn reformatted(&self) -> Value {
        params::reformat_parameters(&self.raw)
    }

    pub fn tree(&self) -> &[TreeNode] {
        &self.tree
    }

    /// Whether the "Original parameters" action is offered.
    pub fn has_original(&self) -> bool {
        params::has_visual_parameters(&self.raw)
    }

    /// Content of the "Original parameters" viewer, if offered.
    pub fn original_panel(&self) -> Option<TextPanel> {
        if !self.has_original() {
            return None;
        }
        let content = params::original_text(&self.raw).ok()?;
        Some(TextPanel {
            title: ORIGINAL_PARAMETERS_TITLE,
            content,
        })
    }

    /// Copy the reformatted parameters and return the message to show.
    pub fn copy_to(&self, clipboard: &mut impl Clipboard) -> StatusMessage {
        let outcome = params::copy_text(&self.raw).and_then(|text| clipboard.write_text(&text));
        match outcome {
            Ok(()) => StatusMessage::success(COPY_SUCCEEDED),
            Err(e) => {
                debug!(error = %e, "copy parameters failed");
                StatusMessage::error(COPY_FAILED)
            }
        }
    }

    pub fn original_viewer(&self) -> OriginalViewer {
        OriginalViewer {
            panel: self.original_panel(),
            open: false,
        }
    }
}

/// Open/closed state of the "Original parameters" viewer. Starts closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalViewer {
    panel: Option<TextPanel>,
    open: bool,
}

impl OriginalViewer {
    /// Whether the "Original parameters" button is shown at all.
    pub fn is_offered(&self) -> bool {
        self.panel.is_some()
    }

    /// Opening does nothing when the parameters have no original form.
    pub fn open(&mut self) {
        self.open = self.panel.is_some();
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// The panel to display while the viewer is open.
    pub fn visible(&self) -> Option<&TextPanel> {
        self.panel.as_ref().filter(|_| self.open)
    }
}

// ─── Log ─────────────────────────────────────────────────────────────────────

/// Files the backend serves from a trial's working directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFile {
    TrialLog,
    Stderr,
    Stdout,
    SlurmStderr,
    SlurmStdout,
}

impl LogFile {
    pub fn file_name(self) -> &'static str {
        match self {
            LogFile::TrialLog => "trial.log",
            LogFile::Stderr => "stderr",
            LogFile::Stdout => "stdout",
            LogFile::SlurmStderr => "slurm_stderr",
            LogFile::SlurmStdout => "slurm_stdout",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LogFile::TrialLog => "View trial log",
            LogFile::Stderr => "View trial error",
            LogFile::Stdout => "View trial stdout",
            LogFile::SlurmStderr => "View slurm error",
            LogFile::SlurmStdout => "View slurm stdout",
        }
    }
}

const LOCAL_FILES: &[LogFile] = &[LogFile::TrialLog, LogFile::Stderr, LogFile::Stdout];
const SLURM_FILES: &[LogFile] = &[
    LogFile::TrialLog,
    LogFile::Stderr,
    LogFile::Stdout,
    LogFile::SlurmStderr,
    LogFile::SlurmStdout,
];

/// What the backend serves for a platform's trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServedLogs {
    pub files: &'static [LogFile],
    /// Whether the tracking-dashboard run is linked next to the files.
    pub tracking: bool,
}

/// Logs reachable through the backend for a platform, or `None` when the
/// platform keeps logs elsewhere.
pub fn served_log_files(platform: &Platform) -> Option<ServedLogs> {
    match platform {
        Platform::Local => Some(ServedLogs {
            files: LOCAL_FILES,
            tracking: false,
        }),
        Platform::Slurm => Some(ServedLogs {
            files: SLURM_FILES,
            tracking: true,
        }),
        Platform::Remote
        | Platform::Pai
        | Platform::Kubeflow
        | Platform::FrameworkController
        | Platform::Aml
        | Platform::Dlc
        | Platform::Adl
        | Platform::Hybrid
        | Platform::Other(_) => None,
    }
}

pub const TRACKING_LABEL: &str = "View W&B Board";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogView {
    /// Log path plus buttons opening files served by the backend.
    Files {
        log_path: String,
        buttons: Vec<LinkButton>,
        tracking: Option<LinkButton>,
    },
    /// Log path only; the training service hosts the logs itself.
    Delegated { log_path: String },
}

impl LogView {
    fn new(trial: &Trial, experiment: &ExperimentContext, links: &TrialLinks<'_>) -> Self {
        let log_path = trial
            .log_path
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| LOG_PATH_UNAVAILABLE.to_string());

        let Some(served) = served_log_files(&experiment.platform) else {
            return LogView::Delegated { log_path };
        };

        let buttons = served
            .files
            .iter()
            .map(|file| LinkButton {
                label: file.label(),
                url: links.trial_file(file.file_name()),
            })
            .collect();

        let tracking = experiment
            .tracking
            .as_ref()
            .filter(|_| served.tracking && trial.status.is_terminal())
            .map(|dashboard| LinkButton {
                label: TRACKING_LABEL,
                url: links.tracking_run(dashboard, trial.sequence_id),
            });

        LogView::Files {
            log_path,
            buttons,
            tracking,
        }
    }

    pub fn log_path(&self) -> &str {
        match self {
            LogView::Files { log_path, .. } | LogView::Delegated { log_path } => log_path,
        }
    }
}

/// Link target for a delegated log path, when it is a web address.
pub fn log_path_link(log_path: &str) -> Option<&str> {
    (log_path.starts_with("http://") || log_path.starts_with("https://")).then_some(log_path)
}

// ─── Visualization ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizationView {
    pub text: &'static str,
    pub button: LinkButton,
}

impl VisualizationView {
    fn new(experiment: &ExperimentContext, links: &TrialLinks<'_>) -> Option<Self> {
        experiment.has_tag(ARCHITECTURE_SEARCH_TAG).then(|| VisualizationView {
            text: VISUALIZATION_TEXT,
            button: LinkButton {
                label: "Netron",
                url: links.model_viewer(),
            },
        })
    }
}
