//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Rejection of an inbound credential.
///
/// Variants exist for logging and for tests. Every variant maps to the
/// same 401 response so callers cannot tell which check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("authorization header missing or not a Bearer credential")]
    MalformedHeader,

    #[error("token is encrypted (dir/A256GCM) and cannot be validated offline; request a token for the configured audience")]
    UnsupportedEncryptedToken,

    #[error("token signing algorithm is not supported")]
    UnsupportedAlgorithm,

    #[error("signed token failed validation")]
    InvalidSignedToken,

    #[error("unauthorized")]
    Unauthorized,
}

impl AuthError {
    /// Stable identifier for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MalformedHeader => "malformed_header",
            AuthError::UnsupportedEncryptedToken => "unsupported_encrypted_token",
            AuthError::UnsupportedAlgorithm => "unsupported_algorithm",
            AuthError::InvalidSignedToken => "invalid_signed_token",
            AuthError::Unauthorized => "unauthorized",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(reason = self.kind(), "Rejecting request with 401");

        let body = Json(json!({
            "error": {
                "code": "UNAUTHORIZED",
                "message": "Unauthorized",
            }
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Failure to obtain a verification key from the trust authority.
///
/// Fatal at startup: the service must not serve traffic without a key.
#[derive(Debug, Error)]
pub enum KeySourceError {
    #[error("key set endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("key set endpoint returned HTTP {status}")]
    Http { status: u16 },

    #[error("key set document is malformed: {0}")]
    Malformed(String),

    #[error("key set contains no keys")]
    EmptyKeySet,

    #[error("first key in set is not a usable RSA signing key: {0}")]
    UnsupportedKey(String),
}
