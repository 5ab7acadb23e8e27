//! trialview-core: model of the trial detail panel for an experiment dashboard.
//!
//! Everything the panel decides (tabs, parameter tree, log buttons, link
//! targets, copy feedback timing) lives here so it runs natively in tests.
//! The Leptos frontend renders a [`TrialPanel`] and plugs in the browser
//! clipboard and timers.

pub mod clipboard;
pub mod config;
pub mod error;
pub mod links;
pub mod message;
pub mod models;
pub mod panel;
pub mod params;
pub mod scheduler;
#[cfg(not(target_arch = "wasm32"))]
pub mod storage;

pub use clipboard::Clipboard;
pub use config::PanelConfig;
pub use error::{Result, TrialViewError};
pub use message::{MessageKind, StatusMessage, TransientMessage};
pub use models::{ExperimentContext, ExperimentProfile, Platform, Trial, TrialLookup, TrialStatus, TrialTable};
pub use panel::{LogView, OriginalViewer, ParameterView, Tab, TrialPanel};
pub use scheduler::{ManualScheduler, Scheduler, TaskHandle};
