//! Data models for trialview.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status of a trial.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrialStatus {
    Waiting,
    Running,
    Unknown,
    Succeeded,
    Failed,
    UserCanceled,
    SysCanceled,
    EarlyStopped,
}

impl TrialStatus {
    /// Whether the trial has finished and will not produce further output.
    pub fn is_terminal(self) -> bool {
        match self {
            TrialStatus::Succeeded
            | TrialStatus::Failed
            | TrialStatus::UserCanceled
            | TrialStatus::SysCanceled
            | TrialStatus::EarlyStopped => true,
            TrialStatus::Waiting | TrialStatus::Running | TrialStatus::Unknown => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrialStatus::Waiting => "WAITING",
            TrialStatus::Running => "RUNNING",
            TrialStatus::Unknown => "UNKNOWN",
            TrialStatus::Succeeded => "SUCCEEDED",
            TrialStatus::Failed => "FAILED",
            TrialStatus::UserCanceled => "USER_CANCELED",
            TrialStatus::SysCanceled => "SYS_CANCELED",
            TrialStatus::EarlyStopped => "EARLY_STOPPED",
        }
    }
}

impl std::fmt::Display for TrialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Training service that executed the trials of an experiment.
///
/// Unrecognised identifiers are kept verbatim in [`Platform::Other`] so a
/// profile written by a newer backend still loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Local,
    Slurm,
    Remote,
    Pai,
    Kubeflow,
    FrameworkController,
    Aml,
    Dlc,
    Adl,
    Hybrid,
    Other(String),
}

impl Platform {
    pub fn as_str(&self) -> &str {
        match self {
            Platform::Local => "local",
            Platform::Slurm => "slurm",
            Platform::Remote => "remote",
            Platform::Pai => "pai",
            Platform::Kubeflow => "kubeflow",
            Platform::FrameworkController => "frameworkcontroller",
            Platform::Aml => "aml",
            Platform::Dlc => "dlc",
            Platform::Adl => "adl",
            Platform::Hybrid => "hybrid",
            Platform::Other(name) => name,
        }
    }
}

impl From<String> for Platform {
    fn from(name: String) -> Self {
        match name.as_str() {
            "local" => Platform::Local,
            "slurm" => Platform::Slurm,
            "remote" => Platform::Remote,
            "pai" => Platform::Pai,
            "kubeflow" => Platform::Kubeflow,
            "frameworkcontroller" => Platform::FrameworkController,
            "aml" => Platform::Aml,
            "dlc" => Platform::Dlc,
            "adl" => Platform::Adl,
            "hybrid" => Platform::Hybrid,
            _ => Platform::Other(name),
        }
    }
}

impl From<&str> for Platform {
    fn from(name: &str) -> Self {
        Platform::from(name.to_string())
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_str().to_string()
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single trial as served by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    #[serde(rename = "trialJobId")]
    pub id: String,
    pub status: TrialStatus,
    pub sequence_id: u32,
    /// Where the training service keeps this trial's output.
    #[serde(default)]
    pub log_path: Option<String>,
    /// Hyperparameters the trial ran with (nested JSON).
    #[serde(default)]
    pub hyper_parameters: Option<Value>,
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl Trial {
    pub fn new(id: impl Into<String>, sequence_id: u32, status: TrialStatus) -> Self {
        Self {
            id: id.into(),
            status,
            sequence_id,
            log_path: None,
            hyper_parameters: None,
            platform: None,
            start_time: None,
            end_time: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.hyper_parameters = Some(parameters);
        self
    }

    pub fn with_log_path(mut self, log_path: impl Into<String>) -> Self {
        self.log_path = Some(log_path.into());
        self
    }

    pub fn duration_secs(&self) -> Option<f64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds() as f64 / 1000.0),
            _ => None,
        }
    }
}

/// Experiment profile as stored on disk and served by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentProfile {
    pub id: String,
    #[serde(default)]
    pub experiment_name: Option<String>,
    pub training_service_platform: Platform,
    #[serde(default)]
    pub use_wandb: bool,
    #[serde(default)]
    pub wandb_link: String,
    #[serde(default)]
    pub wandb_queries: String,
    #[serde(default)]
    pub tag: Vec<String>,
}

/// External tracking dashboard (W&B) the experiment reports to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingDashboard {
    /// Base link of the dashboard project, without trailing slash.
    pub link: String,
    /// Query string appended to every run link, including its leading `?`.
    pub queries: String,
}

/// Read-only experiment context handed to the trial panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentContext {
    pub platform: Platform,
    pub tracking: Option<TrackingDashboard>,
    pub tags: Vec<String>,
}

impl ExperimentContext {
    pub fn new(platform: impl Into<Platform>) -> Self {
        Self {
            platform: platform.into(),
            tracking: None,
            tags: vec![],
        }
    }

    pub fn with_tracking(mut self, link: impl Into<String>, queries: impl Into<String>) -> Self {
        self.tracking = Some(TrackingDashboard {
            link: link.into(),
            queries: queries.into(),
        });
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl From<&ExperimentProfile> for ExperimentContext {
    fn from(profile: &ExperimentProfile) -> Self {
        let tracking = profile.use_wandb.then(|| TrackingDashboard {
            link: profile.wandb_link.clone(),
            queries: profile.wandb_queries.clone(),
        });
        Self {
            platform: profile.training_service_platform.clone(),
            tracking,
            tags: profile.tag.clone(),
        }
    }
}

/// Lookup of trials by identifier.
pub trait TrialLookup {
    fn trial(&self, id: &str) -> Option<&Trial>;
}

/// In-memory trial table ordered by sequence id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialTable {
    trials: Vec<Trial>,
}

impl TrialTable {
    pub fn new(mut trials: Vec<Trial>) -> Self {
        trials.sort_by_key(|t| t.sequence_id);
        Self { trials }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trial> {
        self.trials.iter()
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }
}

impl TrialLookup for TrialTable {
    fn trial(&self, id: &str) -> Option<&Trial> {
        self.trials.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        let terminal: Vec<_> = [
            TrialStatus::Waiting,
            TrialStatus::Running,
            TrialStatus::Unknown,
            TrialStatus::Succeeded,
            TrialStatus::Failed,
            TrialStatus::UserCanceled,
            TrialStatus::SysCanceled,
            TrialStatus::EarlyStopped,
        ]
        .into_iter()
        .filter(|s| s.is_terminal())
        .map(|s| s.as_str())
        .collect();
        assert_eq!(
            terminal,
            ["SUCCEEDED", "FAILED", "USER_CANCELED", "SYS_CANCELED", "EARLY_STOPPED"]
        );
    }

    #[test]
    fn test_platform_keeps_unknown_names() {
        assert_eq!(Platform::from("slurm"), Platform::Slurm);
        assert_eq!(
            Platform::from("openpai-next"),
            Platform::Other("openpai-next".to_string())
        );
        let json = serde_json::to_string(&Platform::FrameworkController).unwrap();
        assert_eq!(json, "\"frameworkcontroller\"");
    }

    #[test]
    fn test_trial_wire_format() {
        let json = r#"{
            "trialJobId": "Ab3xZ",
            "status": "USER_CANCELED",
            "sequenceId": 12,
            "logPath": "file://localhost:/tmp/Ab3xZ",
            "hyperParameters": {"lr": 0.01, "optimizer": "adam"}
        }"#;
        let trial: Trial = serde_json::from_str(json).unwrap();
        assert_eq!(trial.id, "Ab3xZ");
        assert_eq!(trial.status, TrialStatus::UserCanceled);
        assert_eq!(trial.sequence_id, 12);
        assert!(trial.platform.is_none());
        assert_eq!(trial.hyper_parameters.unwrap()["optimizer"], "adam");
    }

    #[test]
    fn test_context_from_profile() {
        let profile = ExperimentProfile {
            id: "exp1".to_string(),
            experiment_name: None,
            training_service_platform: Platform::Slurm,
            use_wandb: false,
            wandb_link: "https://wandb.ai/team/proj".to_string(),
            wandb_queries: "?workspace=user".to_string(),
            tag: vec!["retiarii".to_string()],
        };
        let ctx = ExperimentContext::from(&profile);
        assert!(ctx.tracking.is_none());
        assert!(ctx.has_tag("retiarii"));

        let ctx = ExperimentContext::from(&ExperimentProfile {
            use_wandb: true,
            ..profile
        });
        assert_eq!(ctx.tracking.unwrap().queries, "?workspace=user");
    }

    #[test]
    fn test_trial_table_orders_by_sequence() {
        let table = TrialTable::new(vec![
            Trial::new("c", 3, TrialStatus::Waiting),
            Trial::new("b", 2, TrialStatus::Succeeded),
            Trial::new("a", 1, TrialStatus::Running),
        ]);

        let ids: Vec<_> = table.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.trial("b").unwrap().status, TrialStatus::Succeeded);
        assert!(table.trial("zzz").is_none());
    }
}
