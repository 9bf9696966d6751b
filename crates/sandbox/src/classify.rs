//! Failure classification
//!
//! Rules, first match wins:
//! - connection failure → `Transient` (reported as 503)
//! - 429 → `RateLimited`
//! - 500..=599 → `ServerFault`
//! - 400..=499 → `ClientFault`
//! - anything else → `Unclassified`

use std::fmt;

use crate::CallFailure;

/// Status reported for connection-level failures
pub const SERVICE_UNAVAILABLE: u16 = 503;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Transient,
    RateLimited,
    ClientFault,
    ServerFault,
    Unclassified,
}

impl FailureClass {
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            FailureClass::Transient | FailureClass::RateLimited | FailureClass::ServerFault
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailureClass::Transient => "transient",
            FailureClass::RateLimited => "rate_limited",
            FailureClass::ClientFault => "client_fault",
            FailureClass::ServerFault => "server_fault",
            FailureClass::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure with its retry disposition and, when known, the HTTP status
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedFailure {
    pub class: FailureClass,
    pub status: Option<u16>,
    /// The backend's own error message, present only for HTTP status failures
    pub message: Option<String>,
    pub detail: String,
}

pub fn classify(failure: &CallFailure) -> ClassifiedFailure {
    let (class, status) = match failure {
        CallFailure::Connection(_) => (FailureClass::Transient, Some(SERVICE_UNAVAILABLE)),
        CallFailure::Status { status: 429, .. } => (FailureClass::RateLimited, Some(429)),
        CallFailure::Status { status, .. } if (500..=599).contains(status) => {
            (FailureClass::ServerFault, Some(*status))
        }
        CallFailure::Status { status, .. } if (400..=499).contains(status) => {
            (FailureClass::ClientFault, Some(*status))
        }
        CallFailure::Status { status, .. } => (FailureClass::Unclassified, Some(*status)),
        CallFailure::Malformed(_) | CallFailure::Unexpected(_) => (FailureClass::Unclassified, None),
    };

    let message = match failure {
        CallFailure::Status { message, .. } => Some(message.clone()),
        _ => None,
    };

    ClassifiedFailure {
        class,
        status,
        message,
        detail: failure.to_string(),
    }
}
