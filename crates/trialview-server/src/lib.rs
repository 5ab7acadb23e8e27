//! trialview-server: Axum web server for the trial dashboard.
//!
//! Serves the experiment profile and trial records, the files in each trial's
//! directory (logs, exported models) and the embedded Leptos frontend.

pub mod api;
pub mod state;

use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::state::AppState;

pub use state::ServerConfig;

/// Build the Axum router with all routes.
pub fn build_router(state: AppState, api_prefix: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest(api_prefix, api::router())
        // Frontend: serve embedded static files
        .fallback(api::serve_frontend)
        .with_state(state)
        .layer(cors)
}

/// Start the server on the given address.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::new(config.base_dir.clone());
    let app = build_router(state, &config.api_prefix);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        "trialview dashboard at http://{} (experiment: {})",
        addr,
        config.base_dir.display()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
