//! Bearer credential verification for Sandgate
//!
//! Provides the key-set fetch from the trust authority, signed-token
//! validation, opaque API key pass-through, and an axum extractor that works
//! with any state implementing `FromRef<S>` for `TokenVerifier`.

mod config;
mod error;
mod extractors;
mod identity;
mod jwks;
mod jwt;
mod verifier;

#[cfg(any(test, feature = "test-support"))]
pub mod testutil;

pub use config::AuthConfig;
pub use error::{AuthError, KeySourceError};
pub use extractors::AuthUser;
pub use identity::{Identity, IdentityKind, API_KEY_SUBJECT};
pub use jwks::{parse_key_set, Jwk, Jwks, KeyMaterialProvider, SigningAlgorithm, VerificationKey};
pub use verifier::TokenVerifier;
