//! Sandgate Sandbox API client
//!
//! Provides resilient access to the sandbox provisioning API:
//! - `SandboxBackend` trait with a reqwest implementation and a programmable mock
//! - Failure classification into retryable and terminal classes
//! - A retrying executor with exponential, jittered backoff

pub mod classify;
pub mod client;
pub mod retry;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

use serde_json::Value;
use thiserror::Error;

pub use classify::{classify, ClassifiedFailure, FailureClass};
pub use client::{HttpSandboxBackend, SandboxClientConfig};
pub use reqwest::Method;
pub use retry::{BackendFailure, ResilientExecutor};

/// Raw failure of a single backend call, before classification
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallFailure {
    /// Timeout, DNS, refused connection, TLS failure
    #[error("Sandbox API request failed: {0}")]
    Connection(String),

    #[error("Sandbox API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Sandbox API response could not be parsed: {0}")]
    Malformed(String),

    #[error("Unexpected error calling Sandbox API: {0}")]
    Unexpected(String),
}

#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Sandbox client configuration error: {0}")]
    Configuration(String),
}

/// One HTTP request against the sandbox API.
///
/// `path` holds raw segments; the client percent-encodes each one.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendCall {
    pub method: Method,
    pub path: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl BackendCall {
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, segments)
    }

    fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            path: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Path as it appears in logs, e.g. `/SandboxBackup/result/42`
    pub fn display_path(&self) -> String {
        format!("/{}", self.path.join("/"))
    }
}

/// Transport seam to the sandbox API.
///
/// `credential` is sent verbatim as the `Authorization` header value.
/// `Ok(None)` means the backend accepted the call without a body (202/204).
#[async_trait::async_trait]
pub trait SandboxBackend: Send + Sync {
    async fn call(&self, credential: &str, call: &BackendCall)
        -> Result<Option<Value>, CallFailure>;
}
