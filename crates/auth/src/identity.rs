//! Authenticated identity produced by the verifier

use serde::Serialize;
use serde_json::{Map, Value};

/// Subject recorded for opaque API key callers
pub const API_KEY_SUBJECT: &str = "api_key";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    /// Static `ApiKey` credential, trusted by delegation to the backend
    OpaqueKey,
    /// Signed token whose signature and claims were verified locally
    SignedToken,
}

/// Result of a successful verification. Created per request, never persisted.
///
/// `credential` is the scheme-stripped header value and is forwarded as the
/// backend's own authorization header.
#[derive(Clone, PartialEq)]
pub struct Identity {
    kind: IdentityKind,
    claims: Map<String, Value>,
    credential: String,
}

impl Identity {
    pub(crate) fn opaque_key(credential: &str) -> Self {
        let mut claims = Map::new();
        claims.insert("sub".to_string(), Value::String(API_KEY_SUBJECT.to_string()));
        Self {
            kind: IdentityKind::OpaqueKey,
            claims,
            credential: credential.to_string(),
        }
    }

    pub(crate) fn signed_token(claims: Map<String, Value>, credential: &str) -> Self {
        Self {
            kind: IdentityKind::SignedToken,
            claims,
            credential: credential.to_string(),
        }
    }

    pub fn kind(&self) -> IdentityKind {
        self.kind
    }

    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    pub fn subject(&self) -> Option<&str> {
        self.claims.get("sub").and_then(Value::as_str)
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }
}

// The credential is a live secret; keep it out of logs.
impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("kind", &self.kind)
            .field("subject", &self.subject())
            .field("credential", &"[REDACTED]")
            .finish()
    }
}
