//! Sandbox API HTTP client
//!
//! Sends one `BackendCall` per invocation using reqwest. No retries here;
//! those belong to `ResilientExecutor`.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use sandgate_common::Config;

use crate::{BackendCall, CallFailure, SandboxBackend, SandboxError};

/// JSON fields that may carry the backend's error message, in priority order
const ERROR_FIELDS: [&str; 4] = ["error", "Error", "errorString", "errors"];

#[derive(Debug, Clone)]
pub struct SandboxClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl From<&Config> for SandboxClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.sandbox_api_base_url.clone(),
            timeout: Duration::from_secs(config.sandbox_api_timeout_secs),
        }
    }
}

/// reqwest-backed [`SandboxBackend`]
#[derive(Debug, Clone)]
pub struct HttpSandboxBackend {
    client: Client,
    base_url: Url,
}

impl HttpSandboxBackend {
    pub fn new(config: SandboxClientConfig) -> Result<Self, SandboxError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            SandboxError::Configuration(format!("invalid base URL {}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SandboxError::Configuration(format!(
                "base URL {} cannot carry a path",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SandboxError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL plus percent-encoded path segments and query pairs
    fn url_for(&self, call: &BackendCall) -> Result<Url, CallFailure> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CallFailure::Unexpected("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(call.path.iter().map(String::as_str));

        if !call.query.is_empty() {
            url.query_pairs_mut().extend_pairs(call.query.iter());
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl SandboxBackend for HttpSandboxBackend {
    async fn call(
        &self,
        credential: &str,
        call: &BackendCall,
    ) -> Result<Option<Value>, CallFailure> {
        let url = self.url_for(call)?;

        tracing::debug!(method = %call.method, path = %call.display_path(), "Sending Sandbox API request");

        let mut request = self
            .client
            .request(call.method.clone(), url)
            .header(AUTHORIZATION, credential)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                CallFailure::Unexpected(e.to_string())
            } else {
                CallFailure::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CallFailure::Connection(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), body = %text, "Sandbox API returned error status");
            return Err(CallFailure::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        if status == StatusCode::ACCEPTED
            || status == StatusCode::NO_CONTENT
            || text.trim().is_empty()
        {
            return Ok(None);
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| CallFailure::Malformed(e.to_string()))
    }
}

/// First non-null error field of a JSON error body, else the raw text
fn error_message(body: &str) -> String {
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    ERROR_FIELDS
        .iter()
        .filter_map(|name| fields.get(*name))
        .find(|value| !value.is_null())
        .map(|value| match value {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| body.to_string())
}
