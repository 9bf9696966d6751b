//! Shared test helpers for minting credentials.
//!
//! Available to this crate's tests and, behind the `test-support` feature,
//! to other workspace crates:
//!
//! ```toml
//! [dev-dependencies]
//! sandgate-auth = { workspace = true, features = ["test-support"] }
//! ```
//!
//! The RSA fixtures under `fixtures/` are throwaway keys generated for tests.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

use crate::config::AuthConfig;
use crate::jwks::{parse_key_set, VerificationKey};

pub const TEST_KID: &str = "test-key-1";
pub const TEST_DOMAIN: &str = "tenant.example.auth0.com";
pub const TEST_AUDIENCE: &str = "https://sandbox-api.example.com/";
pub const TEST_HMAC_SECRET: &str = "test-hmac-shared-secret";

const TEST_PRIVATE_KEY_PEM: &str = include_str!("../fixtures/test_rsa_private.pem");
const OTHER_PRIVATE_KEY_PEM: &str = include_str!("../fixtures/other_rsa_private.pem");

/// Public half of `fixtures/test_rsa_private.pem`, base64url modulus
const TEST_MODULUS: &str = "3pPsX5mkqNcdSyDQq08DrmtePrwldYa0dOtHchVQJ5VlPr7CAMXOzHJ3ItLfgWj9unYuEH82meYunW9gnkY_BzQI7o_iKsve2vQM923HirjZSNr-3wG4cG1a5K3NvGp9mBkJ6RQpyVP7wm9GPsof9MF8BX8Izh_koXMO9vAC9vmKEIlFNgd7qjazROSxfKqd0Dy9wFxFD6yRL9uyRdUwLFLkEkiRiu2hVuIcXqJnOQyz6EaLpMUZxdvx-C8E6yZQ6MLRLhIPmVtNhR97wTlIVlggoOE6nzfuqpxrVTxY7HT15HqGiblXvwQZm_0vMuDVlAaju1KL6FDvtshD6MlIEw";
const TEST_EXPONENT: &str = "AQAB";

pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

pub fn test_jwk() -> Value {
    json!({
        "kty": "RSA",
        "kid": TEST_KID,
        "alg": "RS256",
        "use": "sig",
        "n": TEST_MODULUS,
        "e": TEST_EXPONENT,
    })
}

pub fn jwks_json() -> Value {
    json!({ "keys": [test_jwk()] })
}

pub fn verification_key() -> VerificationKey {
    parse_key_set(&jwks_json().to_string()).expect("fixture JWKS must parse")
}

pub fn auth_config() -> AuthConfig {
    AuthConfig::new(TEST_DOMAIN, TEST_AUDIENCE)
}

/// Claims that pass validation against [`auth_config`] for the next hour
pub fn valid_claims() -> Value {
    let now = now();
    json!({
        "sub": "auth0|user-123",
        "aud": TEST_AUDIENCE,
        "iss": format!("https://{}/", TEST_DOMAIN),
        "iat": now,
        "nbf": now - 10,
        "exp": now + 3600,
        "scope": "openid profile",
        "https://sandbox.example.com/email": "user@example.com",
    })
}

pub fn sign_rs256(claims: &Value) -> String {
    sign_with_pem(claims, TEST_PRIVATE_KEY_PEM)
}

/// Signed by a key that is not in the published key set
pub fn sign_rs256_with_untrusted_key(claims: &Value) -> String {
    sign_with_pem(claims, OTHER_PRIVATE_KEY_PEM)
}

pub fn sign_hs256(claims: &Value, secret: &str) -> String {
    let header = Header::new(Algorithm::HS256);
    jsonwebtoken::encode(&header, claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("Failed to encode HS256 test token")
}

/// A five-segment token whose header declares `dir`/`A256GCM`
pub fn encrypted_token() -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"dir","enc":"A256GCM"}"#);
    format!("{}..iv-segment.ciphertext-segment.tag-segment", header)
}

/// A token with an arbitrary header and garbage payload/signature
pub fn token_with_header(header: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(header.to_string());
    let payload = URL_SAFE_NO_PAD.encode(b"{}");
    format!("{}.{}.c2lnbmF0dXJl", header, payload)
}

fn sign_with_pem(claims: &Value, pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(TEST_KID.to_string());
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("fixture PEM must load");
    jsonwebtoken::encode(&header, claims, &key).expect("Failed to encode RS256 test token")
}
