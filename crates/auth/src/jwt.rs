//! Credential parsing and signed-token validation helpers

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{decode, Validation};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::AuthConfig;
use crate::jwks::{SigningAlgorithm, VerificationKey};

pub(crate) const BEARER_PREFIX: &str = "Bearer ";
pub(crate) const API_KEY_MARKER: &str = "ApiKey ";

/// The two disjoint credential shapes, decided by a prefix check alone
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Credential<'a> {
    OpaqueKey(&'a str),
    SignedToken(&'a str),
}

/// Strip the `Bearer ` scheme from an Authorization header value.
pub(crate) fn strip_bearer(header: &str) -> Option<&str> {
    header.strip_prefix(BEARER_PREFIX)
}

pub(crate) fn classify(credential: &str) -> Credential<'_> {
    if credential.starts_with(API_KEY_MARKER) {
        Credential::OpaqueKey(credential)
    } else {
        Credential::SignedToken(credential)
    }
}

/// Header fields read before any signature work
#[derive(Debug, Deserialize)]
pub(crate) struct UnverifiedHeader {
    pub alg: String,
    #[serde(default)]
    pub enc: Option<String>,
}

impl UnverifiedHeader {
    /// `dir` key agreement with A256GCM content encryption, i.e. a JWE
    pub fn is_encrypted(&self) -> bool {
        self.alg == "dir" && self.enc.as_deref() == Some("A256GCM")
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum HeaderError {
    #[error("token has no header segment")]
    Missing,
    #[error("header is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("header is not a JOSE JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode the first segment of a compact token without verifying anything.
///
/// Works for both three-segment JWS and five-segment JWE, unlike
/// `jsonwebtoken::decode_header`.
pub(crate) fn decode_unverified_header(token: &str) -> Result<UnverifiedHeader, HeaderError> {
    let segment = token
        .split('.')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or(HeaderError::Missing)?;
    let bytes = URL_SAFE_NO_PAD.decode(segment.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Why a signed token did not validate; logged, never returned to callers
#[derive(Debug, thiserror::Error)]
pub(crate) enum SignedTokenError {
    #[error("no verification key configured for {0:?}")]
    NoKey(SigningAlgorithm),
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Verify signature, audience, issuer, and temporal claims, returning the
/// full claim set.
pub(crate) fn validate_signed_token(
    token: &str,
    alg: SigningAlgorithm,
    key: &VerificationKey,
    config: &AuthConfig,
) -> Result<Map<String, Value>, SignedTokenError> {
    let decoding_key = key.decoding_key(alg).ok_or(SignedTokenError::NoKey(alg))?;

    let mut validation = Validation::new(alg.as_jwt());
    validation.set_audience(&[&config.audience]);
    validation.set_issuer(&[&config.issuer]);
    validation.set_required_spec_claims(&["exp", "aud", "iss"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Map<String, Value>>(token, decoding_key, &validation)?;
    Ok(token_data.claims)
}
