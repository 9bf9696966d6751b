//! Axum extractor for authenticated requests
//!
//! Generic over any state `S` where `TokenVerifier: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AuthError;
use crate::identity::Identity;
use crate::verifier::TokenVerifier;

/// Authenticated caller (signed token or opaque API key)
#[derive(Debug)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    TokenVerifier: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let verifier = TokenVerifier::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MalformedHeader)?
            .to_str()
            .map_err(|_| AuthError::MalformedHeader)?;

        let identity = verifier.verify(header)?;
        Ok(AuthUser(identity))
    }
}
