//! Request gateway: authenticated identity + operation → backend result
//!
//! Owns no retry or auth logic. It forwards the identity's credential through
//! `ResilientExecutor` and maps whatever failure surfaces to an outward error.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::Value;

use sandgate_auth::Identity;
use sandgate_common::{Error, Result};
use sandgate_sandbox::{BackendFailure, FailureClass, ResilientExecutor, SandboxBackend};

use crate::operations::SandboxOperation;

#[derive(Clone)]
pub struct RequestGateway {
    backend: Arc<dyn SandboxBackend>,
    executor: ResilientExecutor,
}

impl RequestGateway {
    pub fn new(backend: Arc<dyn SandboxBackend>) -> Self {
        Self {
            backend,
            executor: ResilientExecutor::new(),
        }
    }

    pub async fn dispatch(&self, identity: &Identity, operation: SandboxOperation) -> Result<Value> {
        let call = operation.to_call();
        let credential = identity.credential();

        tracing::info!(
            operation = operation.name(),
            identity = ?identity.kind(),
            subject = ?identity.subject(),
            write = operation.is_write(),
            "Dispatching sandbox operation"
        );

        let result = self
            .executor
            .execute(operation.name(), |_attempt| self.backend.call(credential, &call))
            .await;

        match result {
            Ok(body) => Ok(operation.shape(body)),
            Err(failure) => Err(outward_error(failure)),
        }
    }
}

/// Outward error for a failure surfaced by the executor.
///
/// | class | status |
/// |---|---|
/// | `ClientFault` | backend status, else 500 |
/// | `Transient` / `RateLimited` / `ServerFault` | backend status, else 503 |
/// | `Unclassified` | 500 |
///
/// Only client faults echo the backend's message; everything else is generic.
pub fn outward_error(failure: BackendFailure) -> Error {
    let status_or = |fallback: StatusCode| {
        failure
            .status
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(fallback)
    };

    match failure.class {
        FailureClass::ClientFault => Error::Upstream {
            status: status_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: failure
                .message
                .clone()
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| "Sandbox API rejected the request".to_string()),
        },
        FailureClass::Transient | FailureClass::RateLimited | FailureClass::ServerFault => {
            Error::Upstream {
                status: status_or(StatusCode::SERVICE_UNAVAILABLE),
                message: "Sandbox API is unavailable, try again later".to_string(),
            }
        }
        FailureClass::Unclassified => Error::Internal(failure.to_string()),
    }
}
