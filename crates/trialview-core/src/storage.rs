//! Storage layer: experiment profile and trial records on the file system.
//!
//! Layout of an experiment directory:
//!
//! ```text
//! <experiment>/
//!   experiment.yaml
//!   trials/
//!     <trialId>/
//!       trial.yaml
//!       trial.log, stderr, stdout, model.onnx, ...
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Result, TrialViewError};
use crate::models::{ExperimentProfile, Trial};

pub const EXPERIMENT_FILE: &str = "experiment.yaml";
pub const TRIAL_FILE: &str = "trial.yaml";
pub const TRIALS_DIR: &str = "trials";

pub fn trial_dir(base_dir: &Path, trial_id: &str) -> PathBuf {
    base_dir.join(TRIALS_DIR).join(trial_id)
}

// ─── Experiment ───────────────────────────────────────────────────────────────

pub fn load_experiment(base_dir: &Path) -> Result<ExperimentProfile> {
    let path = base_dir.join(EXPERIMENT_FILE);
    if !path.exists() {
        return Err(TrialViewError::ExperimentNotFound(
            path.to_string_lossy().to_string(),
        ));
    }
    let content = fs::read_to_string(&path)?;
    Ok(serde_yaml::from_str(&content)?)
}

pub fn save_experiment(base_dir: &Path, profile: &ExperimentProfile) -> Result<()> {
    fs::create_dir_all(base_dir)?;
    let content = serde_yaml::to_string(profile)?;
    fs::write(base_dir.join(EXPERIMENT_FILE), content)?;
    Ok(())
}

// ─── Trials ───────────────────────────────────────────────────────────────────

pub fn load_trial(base_dir: &Path, trial_id: &str) -> Result<Trial> {
    validate_segment(trial_id)?;
    let path = trial_dir(base_dir, trial_id).join(TRIAL_FILE);
    if !path.exists() {
        return Err(TrialViewError::TrialNotFound(trial_id.to_string()));
    }
    let content = fs::read_to_string(&path)?;
    Ok(serde_yaml::from_str(&content)?)
}

pub fn save_trial(base_dir: &Path, trial: &Trial) -> Result<()> {
    validate_segment(&trial.id)?;
    let dir = trial_dir(base_dir, &trial.id);
    fs::create_dir_all(&dir)?;
    let content = serde_yaml::to_string(trial)?;
    fs::write(dir.join(TRIAL_FILE), content)?;
    Ok(())
}

/// All readable trials, ordered by sequence id. Unreadable records are skipped.
pub fn list_trials(base_dir: &Path) -> Result<Vec<Trial>> {
    let trials_dir = base_dir.join(TRIALS_DIR);
    if !trials_dir.exists() {
        return Ok(vec![]);
    }
    let mut trials = vec![];
    for entry in fs::read_dir(&trials_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(id) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        match load_trial(base_dir, &id) {
            Ok(trial) => trials.push(trial),
            Err(e) => warn!(trial = %id, error = %e, "skipping unreadable trial"),
        }
    }
    trials.sort_by_key(|t| t.sequence_id);
    Ok(trials)
}

/// Path of a file in a trial's directory.
///
/// Both segments must be plain names: empty names, `.`/`..` and anything
/// containing a path separator are rejected.
pub fn trial_file_path(base_dir: &Path, trial_id: &str, filename: &str) -> Result<PathBuf> {
    validate_segment(trial_id)?;
    validate_segment(filename)?;
    Ok(trial_dir(base_dir, trial_id).join(filename))
}

fn validate_segment(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if bad {
        return Err(TrialViewError::InvalidFileName(name.to_string()));
    }
    Ok(())
}
