//! REST API handlers for trialview-server.

use std::path::Path as FsPath;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use mime_guess::mime;
use tracing::{debug, warn};

use trialview_core::{storage, TrialViewError};

use crate::state::AppState;

// ─── Router ──────────────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/experiment", get(get_experiment))
        .route("/trial-jobs", get(list_trial_jobs))
        .route("/trial-jobs/{trial}", get(get_trial_job))
        .route("/trial-file/{trial}/{filename}", get(get_trial_file))
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn error_response(e: TrialViewError) -> Response {
    let status = match &e {
        TrialViewError::TrialNotFound(_) | TrialViewError::ExperimentNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        TrialViewError::InvalidFileName(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        warn!("request failed: {}", e);
    }
    (status, e.to_string()).into_response()
}

/// Logs and other extensionless trial outputs are shown as text in the browser.
fn content_type(filename: &str) -> mime::Mime {
    match mime_guess::from_path(filename).first() {
        Some(m) => m,
        None if FsPath::new(filename).extension().is_none() => mime::TEXT_PLAIN_UTF_8,
        None => mime::APPLICATION_OCTET_STREAM,
    }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn get_experiment(State(state): State<AppState>) -> impl IntoResponse {
    match storage::load_experiment(&state.base_dir) {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => error_response(e),
    }
}

async fn list_trial_jobs(State(state): State<AppState>) -> impl IntoResponse {
    match storage::list_trials(&state.base_dir) {
        Ok(trials) => Json(trials).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_trial_job(
    State(state): State<AppState>,
    Path(trial): Path<String>,
) -> impl IntoResponse {
    match storage::load_trial(&state.base_dir, &trial) {
        Ok(trial) => Json(trial).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_trial_file(
    State(state): State<AppState>,
    Path((trial, filename)): Path<(String, String)>,
) -> impl IntoResponse {
    let file_path = match storage::trial_file_path(&state.base_dir, &trial, &filename) {
        Ok(p) => p,
        Err(e) => return error_response(e),
    };

    // Security: symlinks must not lead out of the trial directory
    let trial_dir = storage::trial_dir(&state.base_dir, &trial);
    let canonical_dir = match trial_dir.canonicalize() {
        Ok(p) => p,
        Err(_) => return (StatusCode::NOT_FOUND, "Trial directory not found").into_response(),
    };
    let canonical_file = match file_path.canonicalize() {
        Ok(p) => p,
        Err(_) => return (StatusCode::NOT_FOUND, "File not found").into_response(),
    };
    if !canonical_file.starts_with(&canonical_dir) {
        return (StatusCode::FORBIDDEN, "Access denied").into_response();
    }

    let data = match tokio::fs::read(&canonical_file).await {
        Ok(data) => data,
        Err(e) => return error_response(e.into()),
    };
    debug!(trial = %trial, file = %filename, bytes = data.len(), "serving trial file");

    Response::builder()
        .header(header::CONTENT_TYPE, content_type(&filename).as_ref())
        .body(Body::from(data))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Path prefix of the model viewer. It is hosted next to the dashboard, not
/// embedded in it, so unknown paths under it are not routed to the SPA.
const MODEL_VIEWER_PREFIX: &str = "netron/";

/// Embedded dashboard assets; any other path gets `index.html` so client-side
/// routes such as `/trials/<id>` load the app.
pub async fn serve_frontend(uri: axum::http::Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    if let Some(asset) = Assets::get(path) {
        return asset_response(path, asset);
    }
    if path.starts_with(MODEL_VIEWER_PREFIX) {
        debug!(path = %path, "model viewer is not bundled with the dashboard");
        return (StatusCode::NOT_FOUND, "Model viewer not installed").into_response();
    }
    match Assets::get("index.html") {
        Some(index) => asset_response("index.html", index),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn asset_response(path: &str, asset: rust_embed::EmbeddedFile) -> Response {
    Response::builder()
        .header(
            header::CONTENT_TYPE,
            mime_guess::from_path(path).first_or_octet_stream().as_ref(),
        )
        .body(Body::from(asset.data.into_owned()))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[derive(rust_embed::Embed)]
#[folder = "../../frontend/dist"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
#[include = "*.wasm"]
struct Assets;
