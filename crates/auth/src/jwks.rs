//! Key material from the trust authority
//!
//! The key set is fetched once at startup. Only the first entry is used and
//! it must be an RSA signing key. There is no refresh: the resulting
//! [`VerificationKey`] is immutable for the life of the process.

use std::time::Duration;

use jsonwebtoken::DecodingKey;
use serde::{Deserialize, Serialize};

use crate::error::KeySourceError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One entry of a JSON Web Key Set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub use_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

/// Signing algorithms accepted for signed tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningAlgorithm {
    Rs256,
    Hs256,
}

impl SigningAlgorithm {
    pub fn from_header(alg: &str) -> Option<Self> {
        match alg {
            "RS256" => Some(SigningAlgorithm::Rs256),
            "HS256" => Some(SigningAlgorithm::Hs256),
            _ => None,
        }
    }

    pub(crate) fn as_jwt(self) -> jsonwebtoken::Algorithm {
        match self {
            SigningAlgorithm::Rs256 => jsonwebtoken::Algorithm::RS256,
            SigningAlgorithm::Hs256 => jsonwebtoken::Algorithm::HS256,
        }
    }
}

/// Verification key derived from the first key-set entry.
///
/// RS256 tokens verify against the RSA public key. HS256 tokens verify
/// against the optional shared secret and are rejected when none is set;
/// the RSA key is never reused as an HMAC secret.
#[derive(Clone)]
pub struct VerificationKey {
    kid: Option<String>,
    rsa: DecodingKey,
    hmac: Option<DecodingKey>,
}

impl VerificationKey {
    /// Convert a key-set entry into a verification key.
    pub fn from_jwk(jwk: &Jwk) -> Result<Self, KeySourceError> {
        if jwk.kty != "RSA" {
            return Err(KeySourceError::UnsupportedKey(format!(
                "expected kty RSA, found {}",
                jwk.kty
            )));
        }

        if let Some(alg) = jwk.alg.as_deref() {
            if !(alg.starts_with("RS") || alg.starts_with("PS")) {
                return Err(KeySourceError::UnsupportedKey(format!(
                    "expected an RSA signature algorithm, found {}",
                    alg
                )));
            }
        }

        let (n, e) = match (jwk.n.as_deref(), jwk.e.as_deref()) {
            (Some(n), Some(e)) if !n.is_empty() && !e.is_empty() => (n, e),
            _ => {
                return Err(KeySourceError::UnsupportedKey(
                    "RSA key is missing modulus or exponent".to_string(),
                ))
            }
        };

        let rsa = DecodingKey::from_rsa_components(n, e)
            .map_err(|e| KeySourceError::UnsupportedKey(e.to_string()))?;

        Ok(Self {
            kid: jwk.kid.clone(),
            rsa,
            hmac: None,
        })
    }

    /// Attach the shared secret used for HS256 tokens.
    pub fn with_hmac_secret(mut self, secret: &str) -> Self {
        self.hmac = Some(DecodingKey::from_secret(secret.as_bytes()));
        self
    }

    pub fn kid(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    pub fn supports_hmac(&self) -> bool {
        self.hmac.is_some()
    }

    pub(crate) fn decoding_key(&self, alg: SigningAlgorithm) -> Option<&DecodingKey> {
        match alg {
            SigningAlgorithm::Rs256 => Some(&self.rsa),
            SigningAlgorithm::Hs256 => self.hmac.as_ref(),
        }
    }
}

impl std::fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationKey")
            .field("kid", &self.kid)
            .field("hmac", &self.hmac.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Fetches the key set from the trust authority.
#[derive(Clone)]
pub struct KeyMaterialProvider {
    http: reqwest::Client,
}

impl KeyMaterialProvider {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Fetch the key set at `url` and derive the verification key from its
    /// first entry.
    pub async fn fetch(&self, url: &str) -> Result<VerificationKey, KeySourceError> {
        tracing::info!(url = %url, "Fetching JWKS");

        let response = self
            .http
            .get(url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| KeySourceError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "JWKS endpoint returned an error");
            return Err(KeySourceError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| KeySourceError::Unreachable(e.to_string()))?;

        let key = parse_key_set(&body)?;
        tracing::info!(kid = ?key.kid(), "Extracted verification key from JWKS");
        Ok(key)
    }
}

impl Default for KeyMaterialProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a key-set document and convert its first entry.
pub fn parse_key_set(body: &str) -> Result<VerificationKey, KeySourceError> {
    let jwks: Jwks = serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, "Invalid JWKS document");
        KeySourceError::Malformed(e.to_string())
    })?;

    let first = jwks.keys.first().ok_or_else(|| {
        tracing::error!("Invalid JWKS data format: empty 'keys' array");
        KeySourceError::EmptyKeySet
    })?;

    VerificationKey::from_jwk(first)
}
