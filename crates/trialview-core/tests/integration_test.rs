//! Integration tests for trialview-core.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;

use trialview_core::panel::{self, LinkButton, LogView, ParameterView, Tab, TRACKING_LABEL};
use trialview_core::params::TreeValue;
use trialview_core::storage;
use trialview_core::{
    Clipboard, ExperimentContext, ExperimentProfile, ManualScheduler, MessageKind, PanelConfig,
    Platform, StatusMessage, TransientMessage, Trial, TrialPanel, TrialStatus, TrialTable,
    TrialViewError,
};

#[derive(Default)]
struct MockClipboard {
    contents: Option<String>,
    fail: bool,
}

impl Clipboard for MockClipboard {
    fn write_text(&mut self, text: &str) -> trialview_core::Result<()> {
        if self.fail {
            return Err(TrialViewError::Clipboard("permission denied".to_string()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

fn nas_trial() -> Trial {
    Trial::new("GjhDk", 7, TrialStatus::Succeeded)
        .with_log_path("file://localhost:/home/user/nni-experiments/exp/trials/GjhDk")
        .with_parameters(json!({
            "mutation_summary": {"conv1": "conv5x5", "skip": 1},
            "model_symbol": "gAJjZGVm..."
        }))
}

fn panel_for(trial: &Trial, experiment: &ExperimentContext) -> TrialPanel {
    TrialPanel::build(trial, experiment, &PanelConfig::default())
}

fn file_buttons(view: &LogView) -> (&[LinkButton], Option<&LinkButton>) {
    match view {
        LogView::Files { buttons, tracking, .. } => (buttons.as_slice(), tracking.as_ref()),
        LogView::Delegated { .. } => panic!("expected served log files"),
    }
}

// ─── Parameters ──────────────────────────────────────────────────────────────

#[test]
fn test_parameter_tree_follows_reformatted_value() {
    let panel = panel_for(&nas_trial(), &ExperimentContext::new(Platform::Local));
    let ParameterView::Available(details) = &panel.parameters else {
        panic!("parameters should be available");
    };
    let keys: Vec<_> = details.tree().iter().map(|n| n.key.as_str()).collect();
    assert_eq!(keys, ["conv1", "skip"]);
    assert_eq!(details.tree()[0].value, TreeValue::Leaf("\"conv5x5\"".to_string()));
}

#[test]
fn test_missing_parameters_show_error_text() {
    let trial = Trial::new("noParams", 1, TrialStatus::Running);
    let panel = panel_for(&trial, &ExperimentContext::new(Platform::Local));
    assert_eq!(
        panel.parameters,
        ParameterView::Unavailable {
            message: "This trial's parameters are not available."
        }
    );
}

#[test]
fn test_copy_writes_four_space_json_of_reformatted_parameters() {
    let panel = panel_for(&nas_trial(), &ExperimentContext::new(Platform::Local));
    let ParameterView::Available(details) = &panel.parameters else {
        panic!("parameters should be available");
    };
    let mut clipboard = MockClipboard::default();
    let message = details.copy_to(&mut clipboard);

    assert_eq!(message.kind, MessageKind::Success);
    assert_eq!(
        clipboard.contents.as_deref(),
        Some("{\n    \"conv1\": \"conv5x5\",\n    \"skip\": 1\n}")
    );
}

#[test]
fn test_copy_failure_reports_error_and_hides_after_timeout() {
    let panel = panel_for(&nas_trial(), &ExperimentContext::new(Platform::Local));
    let ParameterView::Available(details) = &panel.parameters else {
        panic!("parameters should be available");
    };
    let scheduler = ManualScheduler::new();
    let shown: Rc<RefCell<Option<StatusMessage>>> = Rc::new(RefCell::new(None));
    let slot = shown.clone();
    let config = PanelConfig::default();
    let mut message = TransientMessage::new(scheduler.clone(), config.message_timeout(), move |m| {
        *slot.borrow_mut() = m;
    });

    let mut clipboard = MockClipboard {
        fail: true,
        ..Default::default()
    };
    message.show(details.copy_to(&mut clipboard));
    assert_eq!(
        shown.borrow().clone(),
        Some(StatusMessage::error("Failed !"))
    );

    scheduler.advance(Duration::from_millis(2000));
    assert!(shown.borrow().is_none());
}

#[test]
fn test_original_parameters_only_for_architecture_search() {
    let panel = panel_for(&nas_trial(), &ExperimentContext::new(Platform::Local));
    let ParameterView::Available(details) = &panel.parameters else {
        panic!("parameters should be available");
    };
    let original = details.original_panel().expect("original parameters offered");
    assert_eq!(original.title, "Retiarii parameters");
    assert!(original.content.starts_with("{\n  \"mutation_summary\": {\n    \"conv1\""));

    let plain = Trial::new("plain", 2, TrialStatus::Running).with_parameters(json!({"lr": 0.1}));
    let panel = panel_for(&plain, &ExperimentContext::new(Platform::Local));
    let ParameterView::Available(details) = &panel.parameters else {
        panic!("parameters should be available");
    };
    assert!(!details.has_original());
    assert!(details.original_panel().is_none());
}

#[test]
fn test_original_parameters_viewer_opens_and_closes() {
    let panel = panel_for(&nas_trial(), &ExperimentContext::new(Platform::Local));
    let ParameterView::Available(details) = &panel.parameters else {
        panic!("parameters should be available");
    };
    let mut viewer = details.original_viewer();
    assert!(viewer.is_offered());
    assert!(viewer.visible().is_none());

    viewer.open();
    let shown = viewer.visible().expect("viewer open");
    assert_eq!(shown.title, "Retiarii parameters");
    assert_eq!(Some(shown.clone()), details.original_panel());

    viewer.close();
    assert!(viewer.visible().is_none());
}

#[test]
fn test_original_parameters_viewer_absent_without_summary() {
    let plain = Trial::new("plain", 2, TrialStatus::Running).with_parameters(json!({"lr": 0.1}));
    let panel = panel_for(&plain, &ExperimentContext::new(Platform::Local));
    let ParameterView::Available(details) = &panel.parameters else {
        panic!("parameters should be available");
    };
    let mut viewer = details.original_viewer();
    assert!(!viewer.is_offered());
    viewer.open();
    assert!(viewer.visible().is_none());
}

#[test]
fn test_copy_prints_integral_floats_as_integers() {
    let trial = Trial::new("floats", 3, TrialStatus::Succeeded)
        .with_parameters(serde_json::from_str(r#"{"momentum": 1.0}"#).unwrap());
    let panel = panel_for(&trial, &ExperimentContext::new(Platform::Local));
    let ParameterView::Available(details) = &panel.parameters else {
        panic!("parameters should be available");
    };
    let mut clipboard = MockClipboard::default();
    details.copy_to(&mut clipboard);
    assert_eq!(clipboard.contents.as_deref(), Some("{\n    \"momentum\": 1\n}"));
}

// ─── Log ─────────────────────────────────────────────────────────────────────

#[test]
fn test_local_platform_has_three_file_buttons() {
    let panel = panel_for(&nas_trial(), &ExperimentContext::new(Platform::Local));
    let (buttons, tracking) = file_buttons(&panel.log);
    let urls: Vec<_> = buttons.iter().map(|b| b.url.as_str()).collect();
    assert_eq!(
        urls,
        [
            "/api/v1/nni/trial-file/GjhDk/trial.log",
            "/api/v1/nni/trial-file/GjhDk/stderr",
            "/api/v1/nni/trial-file/GjhDk/stdout",
        ]
    );
    assert!(tracking.is_none());
}

#[test]
fn test_slurm_platform_has_five_file_buttons() {
    let panel = panel_for(&nas_trial(), &ExperimentContext::new("slurm"));
    let (buttons, _) = file_buttons(&panel.log);
    let labels: Vec<_> = buttons.iter().map(|b| b.label).collect();
    assert_eq!(
        labels,
        [
            "View trial log",
            "View trial error",
            "View trial stdout",
            "View slurm error",
            "View slurm stdout",
        ]
    );
    assert_eq!(buttons[4].url, "/api/v1/nni/trial-file/GjhDk/slurm_stdout");
}

#[test]
fn test_other_platforms_delegate_log_view() {
    for platform in ["remote", "pai", "kubeflow", "some-new-service"] {
        let panel = panel_for(&nas_trial(), &ExperimentContext::new(platform));
        assert!(
            matches!(panel.log, LogView::Delegated { .. }),
            "{platform} should delegate"
        );
        assert!(panel.log.log_path().starts_with("file://"));
    }
}

#[test]
fn test_missing_log_path_placeholder() {
    let trial = Trial::new("x", 1, TrialStatus::Waiting);
    let panel = panel_for(&trial, &ExperimentContext::new(Platform::Local));
    assert_eq!(panel.log.log_path(), "This trial's log path is not available.");
}

#[test]
fn test_tracking_button_requires_flag_and_terminal_status() {
    let tracked = ExperimentContext::new(Platform::Slurm)
        .with_tracking("https://wandb.ai/lab/nas", "?workspace=user-lab");

    let panel = panel_for(&nas_trial(), &tracked);
    let (_, tracking) = file_buttons(&panel.log);
    assert_eq!(
        tracking.map(|b| b.url.as_str()),
        Some("https://wandb.ai/lab/nas/runs/007-GjhDk?workspace=user-lab")
    );

    let mut running = nas_trial();
    running.status = TrialStatus::Running;
    let panel = panel_for(&running, &tracked);
    assert!(file_buttons(&panel.log).1.is_none());

    for status in [
        TrialStatus::Failed,
        TrialStatus::UserCanceled,
        TrialStatus::SysCanceled,
        TrialStatus::EarlyStopped,
    ] {
        let mut trial = nas_trial();
        trial.status = status;
        let panel = panel_for(&trial, &tracked);
        assert!(file_buttons(&panel.log).1.is_some(), "{status} is terminal");
    }

    let untracked = ExperimentContext::new(Platform::Slurm);
    let panel = panel_for(&nas_trial(), &untracked);
    assert!(file_buttons(&panel.log).1.is_none());
}

#[test]
fn test_tracking_button_only_on_slurm() {
    let platforms = [
        Platform::Local,
        Platform::Slurm,
        Platform::Remote,
        Platform::Kubeflow,
        Platform::from("some-new-service"),
    ];
    let statuses = [TrialStatus::Running, TrialStatus::Succeeded, TrialStatus::Failed];

    for platform in platforms {
        for tracked in [false, true] {
            for status in statuses {
                let mut experiment = ExperimentContext::new(platform.clone());
                if tracked {
                    experiment = experiment.with_tracking("https://wandb.ai/lab/nas", "?q=1");
                }
                let mut trial = nas_trial();
                trial.status = status;
                let panel = panel_for(&trial, &experiment);

                let expect_button = platform == Platform::Slurm && tracked && status.is_terminal();
                let tracking = match &panel.log {
                    LogView::Files { tracking, .. } => tracking.as_ref(),
                    LogView::Delegated { .. } => None,
                };
                assert_eq!(
                    tracking.map(|b| b.label),
                    expect_button.then_some(TRACKING_LABEL),
                    "{platform} tracked={tracked} {status}"
                );
            }
        }
    }
}

#[test]
fn test_local_with_tracking_keeps_three_buttons() {
    let tracked = ExperimentContext::new(Platform::Local)
        .with_tracking("https://wandb.ai/x", "?q=1");
    let panel = panel_for(&nas_trial(), &tracked);
    let (buttons, tracking) = file_buttons(&panel.log);
    assert_eq!(buttons.len(), 3);
    assert!(tracking.is_none());
}

#[test]
fn test_delegated_log_link_only_for_web_addresses() {
    assert_eq!(
        panel::log_path_link("https://pai.example.com/job/1"),
        Some("https://pai.example.com/job/1")
    );
    assert_eq!(panel::log_path_link("file://localhost:/tmp/x"), None);
}

// ─── Visualization ───────────────────────────────────────────────────────────

#[test]
fn test_visualization_tab_requires_architecture_search_tag() {
    let plain = panel_for(&nas_trial(), &ExperimentContext::new(Platform::Local));
    assert_eq!(plain.tabs(), [Tab::Parameters, Tab::Log]);
    assert!(plain.visualization.is_none());

    let nas = ExperimentContext::new(Platform::Local).with_tag("retiarii");
    let panel = panel_for(&nas_trial(), &nas);
    assert_eq!(panel.tabs(), [Tab::Parameters, Tab::Log, Tab::Visualization]);
    let view = panel.visualization.unwrap();
    assert_eq!(view.button.label, "Netron");
    assert_eq!(
        view.button.url,
        "/netron/index.html?url=/api/v1/nni/trial-file/GjhDk/model.onnx"
    );
}

#[test]
fn test_panel_for_unknown_trial() {
    let table = TrialTable::new(vec![nas_trial()]);
    let ctx = ExperimentContext::new(Platform::Local);
    let config = PanelConfig::default();
    assert!(TrialPanel::for_trial(&table, "GjhDk", &ctx, &config).is_ok());
    assert!(matches!(
        TrialPanel::for_trial(&table, "missing", &ctx, &config),
        Err(TrialViewError::TrialNotFound(id)) if id == "missing"
    ));
}

// ─── Storage ─────────────────────────────────────────────────────────────────

#[test]
fn test_storage_round_trip_and_ordering() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path();

    let profile = ExperimentProfile {
        id: "exp01".to_string(),
        experiment_name: Some("nas-cifar".to_string()),
        training_service_platform: Platform::Slurm,
        use_wandb: true,
        wandb_link: "https://wandb.ai/lab/nas".to_string(),
        wandb_queries: String::new(),
        tag: vec!["retiarii".to_string()],
    };
    storage::save_experiment(base, &profile).unwrap();
    storage::save_trial(base, &Trial::new("later", 3, TrialStatus::Running)).unwrap();
    storage::save_trial(base, &nas_trial()).unwrap();

    assert_eq!(storage::load_experiment(base).unwrap(), profile);

    let trials = storage::list_trials(base).unwrap();
    let ids: Vec<_> = trials.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["GjhDk", "later"]);
    assert_eq!(trials[0], nas_trial());
}

#[test]
fn test_list_trials_skips_broken_records() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path();
    storage::save_trial(base, &nas_trial()).unwrap();
    let broken = storage::trial_dir(base, "broken");
    std::fs::create_dir_all(&broken).unwrap();
    std::fs::write(broken.join("trial.yaml"), "status: [not, a, status]").unwrap();

    let trials = storage::list_trials(base).unwrap();
    assert_eq!(trials.len(), 1);
}

#[test]
fn test_missing_experiment_profile() {
    let tmp = TempDir::new().unwrap();
    assert!(matches!(
        storage::load_experiment(tmp.path()),
        Err(TrialViewError::ExperimentNotFound(_))
    ));
    assert!(storage::list_trials(tmp.path()).unwrap().is_empty());
}
