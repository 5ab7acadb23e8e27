//! Error types for trialview-core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrialViewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Trial not found: {0}")]
    TrialNotFound(String),

    #[error("Experiment profile not found: {0}")]
    ExperimentNotFound(String),

    #[error("Invalid trial file name: {0:?}")]
    InvalidFileName(String),

    #[error("Clipboard write failed: {0}")]
    Clipboard(String),
}

pub type Result<T> = std::result::Result<T, TrialViewError>;
