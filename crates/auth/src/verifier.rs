//! Bearer credential verification
//!
//! Order of checks:
//! 1. `Bearer ` scheme prefix
//! 2. `ApiKey ` marker: opaque pass-through, no local crypto
//! 3. unverified header: `dir`/`A256GCM` is rejected as an encrypted token
//! 4. RS256/HS256: signature, audience, issuer, nbf, exp
//! 5. anything else: unsupported algorithm
//!
//! Unexpected failures collapse into [`AuthError::Unauthorized`] after the
//! cause is logged.

use std::sync::Arc;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::identity::Identity;
use crate::jwks::{SigningAlgorithm, VerificationKey};
use crate::jwt::{
    classify, decode_unverified_header, strip_bearer, validate_signed_token, Credential,
    HeaderError,
};

/// Internal outcome carrying causes that must not reach the caller
#[derive(Debug, thiserror::Error)]
enum VerifyError {
    #[error(transparent)]
    Rejected(AuthError),
    #[error("unreadable token header: {0}")]
    Header(#[from] HeaderError),
}

impl From<AuthError> for VerifyError {
    fn from(err: AuthError) -> Self {
        VerifyError::Rejected(err)
    }
}

/// Verifies inbound credentials against an immutable key and config.
///
/// Cheap to clone; the key is shared read-only across requests.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    key: Arc<VerificationKey>,
    config: Arc<AuthConfig>,
}

impl TokenVerifier {
    pub fn new(key: VerificationKey, config: AuthConfig) -> Self {
        Self {
            key: Arc::new(key),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Verify a full `Authorization` header value.
    pub fn verify(&self, authorization: &str) -> Result<Identity, AuthError> {
        match self.verify_inner(authorization) {
            Ok(identity) => Ok(identity),
            Err(VerifyError::Rejected(err)) => {
                tracing::warn!(reason = err.kind(), error = %err, "Credential rejected");
                Err(err)
            }
            Err(other) => {
                tracing::warn!(error = %other, "Auth error");
                Err(AuthError::Unauthorized)
            }
        }
    }

    fn verify_inner(&self, authorization: &str) -> Result<Identity, VerifyError> {
        let credential = strip_bearer(authorization).ok_or(AuthError::MalformedHeader)?;

        let token = match classify(credential) {
            Credential::OpaqueKey(raw) => {
                tracing::debug!("Accepted opaque API key credential");
                return Ok(Identity::opaque_key(raw));
            }
            Credential::SignedToken(token) => token,
        };

        let header = decode_unverified_header(token)?;

        if header.is_encrypted() {
            return Err(AuthError::UnsupportedEncryptedToken.into());
        }

        let alg = SigningAlgorithm::from_header(&header.alg).ok_or_else(|| {
            tracing::debug!(alg = %header.alg, "Unsupported token algorithm");
            AuthError::UnsupportedAlgorithm
        })?;

        let claims = validate_signed_token(token, alg, &self.key, &self.config).map_err(|e| {
            tracing::debug!(error = %e, alg = ?alg, "Signed token validation failed");
            AuthError::InvalidSignedToken
        })?;

        let identity = Identity::signed_token(claims, token);
        tracing::info!(subject = ?identity.subject(), "Verified signed token");
        Ok(identity)
    }
}
