//! REST calls to trialview-server.

use trialview_core::{ExperimentProfile, Trial};

async fn get_json<T: serde::de::DeserializeOwned>(url: &str, what: &str) -> Result<T, String> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !resp.ok() {
        return Err(format!("Error fetching {}: {}", what, resp.status()));
    }

    let text = resp.text().await.map_err(|e| e.to_string())?;
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

pub async fn fetch_experiment(base: String) -> Result<ExperimentProfile, String> {
    get_json(&format!("{}/experiment", base), "experiment").await
}

pub async fn fetch_trials(base: String) -> Result<Vec<Trial>, String> {
    get_json(&format!("{}/trial-jobs", base), "trials").await
}
