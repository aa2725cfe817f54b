//! Release update check against the GitHub releases API.

use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::UpdateConfig;
use crate::http::server::AppState;

const USER_AGENT: &str = "void-maintenance-server";

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubRelease {
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateCheckResponse {
    pub current_version: String,
    pub latest_version: String,
    pub update_available: bool,
    pub download_url: String,
    pub release_page: String,
}

/// Queries the latest published release of the configured repository.
#[derive(Debug, Clone)]
pub struct UpdateChecker {
    client: reqwest::Client,
    api_base: String,
    repository: String,
}

impl UpdateChecker {
    pub fn new(config: &UpdateConfig) -> Result<Self, UpdateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            repository: config.repository.clone(),
        })
    }

    pub async fn latest_release(&self) -> Result<GithubRelease, UpdateError> {
        let url = format!("{}/repos/{}/releases/latest", self.api_base, self.repository);
        let release = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<GithubRelease>()
            .await?;
        Ok(release)
    }

    pub async fn check(&self, current_version: &str) -> Result<UpdateCheckResponse, UpdateError> {
        let release = self.latest_release().await?;

        Ok(UpdateCheckResponse {
            current_version: current_version.to_string(),
            update_available: is_update_available(&release.tag_name, current_version),
            latest_version: release.tag_name,
            download_url: format!(
                "https://github.com/{}/releases/latest/download/void",
                self.repository
            ),
            release_page: release.html_url,
        })
    }
}

/// A non-empty tag that differs from the running version, ignoring a `v` prefix.
pub fn is_update_available(tag: &str, current: &str) -> bool {
    !tag.is_empty() && tag.trim_start_matches('v') != current.trim_start_matches('v')
}

pub async fn update_check_handler(State(state): State<AppState>) -> Response {
    match state.updates.check(state.build.version).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Update check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Failed to check for updates: {e}"),
            )
                .into_response()
        }
    }
}
