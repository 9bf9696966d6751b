//! Sandgate application composition root
//!
//! Builds the verifier and gateway from configuration and composes the
//! domain router with shared infrastructure routes and middleware.

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use sandgate_auth::{AuthConfig, KeyMaterialProvider, KeySourceError, TokenVerifier, VerificationKey};
use sandgate_common::Config;
use sandgate_sandbox::{HttpSandboxBackend, SandboxBackend, SandboxClientConfig};
use sandgate_sandbox_domain::{RequestGateway, SandboxState};

/// Fetch the verification key from the trust authority.
///
/// Called once before the listener binds; an error here must stop startup.
pub async fn fetch_verification_key(config: &Config) -> Result<VerificationKey, KeySourceError> {
    let key = KeyMaterialProvider::new().fetch(&config.jwks_url()).await?;
    Ok(match &config.auth0_client_secret {
        Some(secret) => key.with_hmac_secret(secret),
        None => key,
    })
}

/// Create the main application router backed by the real Sandbox API
pub fn create_app(config: &Config, key: VerificationKey) -> Result<Router, anyhow::Error> {
    let backend = HttpSandboxBackend::new(SandboxClientConfig::from(config))?;
    Ok(app_with_backend(config, key, Arc::new(backend)))
}

/// Create the application router over any backend
pub fn app_with_backend(
    config: &Config,
    key: VerificationKey,
    backend: Arc<dyn SandboxBackend>,
) -> Router {
    let state = SandboxState {
        verifier: TokenVerifier::new(key, AuthConfig::from(config)),
        gateway: RequestGateway::new(backend),
    };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(sandgate_sandbox_domain::routes().with_state(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("SAMEORIGIN"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .into_inner(),
        )
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "Ok"
}
