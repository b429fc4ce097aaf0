//! Client for the remote extraction backend.
//!
//! The backend is an opaque HTTP collaborator: one `POST /extract` with a
//! multipart `url` field, answered with JSON. Nothing is retried here; a
//! failed call is collapsed into a fixed user-facing result.

use std::time::Duration;

use thiserror::Error;

use crate::config::AppConfig;
use crate::model::{CONNECTION_ERROR, ExtractionResult};

const APP_USER_AGENT: &str = concat!("TwiHub-Desktop/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Transport failure, non-2xx status, or an undecodable body
    #[error("extraction request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// HTTP client bound to one backend base URL.
///
/// Cheap to clone (the inner client is reference-counted), so the view can
/// hand copies to spawned tasks.
#[derive(Clone)]
pub struct ExtractorClient {
    http: reqwest::Client,
    base_url: String,
}

impl ExtractorClient {
    pub fn new(config: &AppConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            http,
            base_url: config.base_url.clone(),
        }
    }

    /// Full URL of the extraction endpoint.
    fn endpoint(&self) -> String {
        format!("{}/extract", self.base_url.trim_end_matches('/'))
    }

    /// Submit one URL for extraction and decode the backend's answer.
    pub async fn extract(&self, url: &str) -> Result<ExtractionResult, ExtractError> {
        let form = reqwest::multipart::Form::new().text("url", url.trim().to_owned());
        let result = self
            .http
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json::<ExtractionResult>()
            .await?;
        Ok(result)
    }
}

/// Collapse an extraction outcome into what the view stores.
///
/// Any request-side failure becomes the fixed connection-error result; the
/// cause is logged, never shown. Backend-reported failures pass through
/// untouched so their own message can render.
pub fn resolve_outcome(result: Result<ExtractionResult, ExtractError>) -> ExtractionResult {
    match result {
        Ok(info) => info,
        Err(err) => {
            tracing::warn!("extraction failed: {err}");
            ExtractionResult::failure(CONNECTION_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, Environment};

    fn client_for(base_url: &str) -> ExtractorClient {
        ExtractorClient::new(&AppConfig {
            base_url: base_url.to_owned(),
        })
    }

    // a real reqwest::Error, produced without touching the network
    fn request_error() -> ExtractError {
        let err = reqwest::Client::new()
            .get("no-scheme")
            .build()
            .unwrap_err();
        ExtractError::Request(err)
    }

    #[test]
    fn endpoint_is_extract_under_base() {
        let client = client_for("http://localhost:8000");
        assert_eq!(client.endpoint(), "http://localhost:8000/extract");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = client_for("http://localhost:8000/");
        assert_eq!(client.endpoint(), "http://localhost:8000/extract");
    }

    #[test]
    fn production_config_points_at_hosted_backend() {
        let client = ExtractorClient::new(&AppConfig::for_environment(Environment::Production));
        assert_eq!(
            client.endpoint(),
            "https://twihub-backend-production.up.railway.app/extract"
        );
    }

    #[test]
    fn request_failure_collapses_to_connection_error() {
        let shown = resolve_outcome(Err(request_error()));
        assert!(!shown.success);
        assert_eq!(shown.error_text(), CONNECTION_ERROR);
    }

    #[test]
    fn backend_answer_passes_through() {
        let shown = resolve_outcome(Ok(ExtractionResult::failure("Invalid URL")));
        assert_eq!(shown.error_text(), "Invalid URL");
    }
}
