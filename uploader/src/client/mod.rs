//! Client for the Pelanor custom metrics API.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pelanor_metrics::{MetricsClient, UploaderConfig};
//!
//! let client = MetricsClient::new(UploaderConfig::from_env()?)?;
//! match client.post_metric(&payload).await? {
//!     UploadOutcome::Created { id } => println!("created {:?}", id),
//!     UploadOutcome::Rejected { status, body } => println!("{} {}", status, body),
//! }
//! ```
//!
//! One request per metric. Non-2xx answers are returned as
//! [`UploadOutcome::Rejected`], never retried.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::UploaderConfig;
use crate::error::{UploadError, UploadResult};
use crate::models::MetricPayload;

/// What the API said about one metric.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// 200 or 201. `id` is the server-assigned identifier, if the body had one.
    Created { id: Option<String> },
    /// Any other status, with the raw response body.
    Rejected { status: u16, body: String },
}

impl UploadOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, UploadOutcome::Created { .. })
    }
}

/// Custom metrics API client
#[derive(Clone)]
pub struct MetricsClient {
    http: reqwest::Client,
    url: String,
    api_token: String,
}

impl MetricsClient {
    /// Create a client; the configured timeout bounds every request.
    pub fn new(config: UploaderConfig) -> UploadResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(UploadError::ClientBuild)?;

        Ok(Self {
            http,
            url: config.custom_metrics_url(),
            api_token: config.api_token,
        })
    }

    /// Endpoint this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST a metric once and classify the response.
    pub async fn post_metric(&self, payload: &MetricPayload) -> UploadResult<UploadOutcome> {
        tracing::debug!(
            url = %self.url,
            metric = %payload.metric_name,
            points = payload.point_count(),
            "posting custom metric"
        );

        let response = self
            .http
            .post(&self.url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_token))
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(UploadError::RequestFailed)?;

        let status = response.status();
        let body = response.text().await.map_err(UploadError::RequestFailed)?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "API responded");

        classify_response(status, &body)
    }
}

/// Map an HTTP status and body to an [`UploadOutcome`].
///
/// Only 200 and 201 count as created; their body must be JSON.
pub fn classify_response(status: StatusCode, body: &str) -> UploadResult<UploadOutcome> {
    if status != StatusCode::OK && status != StatusCode::CREATED {
        return Ok(UploadOutcome::Rejected {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let json: Value = serde_json::from_str(body).map_err(|e| {
        UploadError::InvalidResponse(format!(
            "{}. Response was: {}",
            e,
            body.chars().take(200).collect::<String>()
        ))
    })?;

    let id = match json.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    Ok(UploadOutcome::Created { id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_with_id() {
        let outcome = classify_response(StatusCode::CREATED, r#"{"id":"abc"}"#).unwrap();
        assert_eq!(outcome, UploadOutcome::Created { id: Some("abc".into()) });
    }

    #[test]
    fn test_ok_with_numeric_id() {
        let outcome = classify_response(StatusCode::OK, r#"{"id":42}"#).unwrap();
        assert_eq!(outcome, UploadOutcome::Created { id: Some("42".into()) });
    }

    #[test]
    fn test_created_without_id() {
        let outcome = classify_response(StatusCode::OK, "{}").unwrap();
        assert_eq!(outcome, UploadOutcome::Created { id: None });
    }

    #[test]
    fn test_server_error_is_rejected() {
        let outcome = classify_response(StatusCode::INTERNAL_SERVER_ERROR, "server error").unwrap();
        assert_eq!(
            outcome,
            UploadOutcome::Rejected { status: 500, body: "server error".into() }
        );
    }

    #[test]
    fn test_accepted_is_not_created() {
        let outcome = classify_response(StatusCode::ACCEPTED, "{}").unwrap();
        assert!(!outcome.is_created());
    }

    #[test]
    fn test_success_body_must_be_json() {
        let err = classify_response(StatusCode::CREATED, "<html>").unwrap_err();
        assert!(matches!(err, UploadError::InvalidResponse(_)));
    }
}
