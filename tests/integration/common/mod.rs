//! Common test utilities for integration tests
//!
//! - `TestGateway`: wiremock trust authority and Sandbox API plus the app router
//! - Request helpers returning status and parsed JSON body

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sandgate_auth::{testutil, KeyMaterialProvider, VerificationKey};
use sandgate_common::Config;

pub const API_KEY_HEADER: &str = "Bearer ApiKey sk-integration";
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

pub struct TestGateway {
    pub authority: MockServer,
    pub backend: MockServer,
    pub app: Router,
}

impl TestGateway {
    pub async fn new() -> Self {
        let authority = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(testutil::jwks_json()))
            .mount(&authority)
            .await;

        let backend = MockServer::start().await;
        let key = fetch_key(&authority).await;
        let app = sandgate_app::create_app(&config_for(&backend.uri()), key).unwrap();

        Self {
            authority,
            backend,
            app,
        }
    }

    pub async fn get(&self, uri: &str, authorization: Option<&str>) -> (StatusCode, Value) {
        self.send("GET", uri, authorization, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        authorization: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.send("POST", uri, authorization, Some(body)).await
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Requests the Sandbox API received so far
    pub async fn backend_requests(&self) -> Vec<wiremock::Request> {
        self.backend.received_requests().await.unwrap_or_default()
    }
}

/// Gateway configuration pointing at a test backend
pub fn config_for(backend_url: &str) -> Config {
    Config {
        auth0_domain: testutil::TEST_DOMAIN.to_string(),
        auth0_audience: testutil::TEST_AUDIENCE.to_string(),
        auth0_client_secret: None,
        sandbox_api_base_url: backend_url.to_string(),
        sandbox_api_timeout_secs: 5,
        rust_log: "sandgate=debug".to_string(),
        port: 0,
    }
}

pub async fn fetch_key(authority: &MockServer) -> VerificationKey {
    KeyMaterialProvider::new()
        .fetch(&format!("{}{}", authority.uri(), JWKS_PATH))
        .await
        .unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
