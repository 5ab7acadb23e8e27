//! Shared application state for the Axum server.

use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Experiment directory holding `experiment.yaml` and `trials/`.
    pub base_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir: Arc::new(base_dir),
        }
    }
}

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub base_dir: PathBuf,
    pub host: String,
    pub port: u16,
    /// Mount point of the REST API; the frontend's `backend_base` must match.
    pub api_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("experiment"),
            host: "127.0.0.1".to_string(),
            port: 8080,
            api_prefix: "/api/v1/nni".to_string(),
        }
    }
}
