//! Key material fetch at startup

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sandgate_auth::{testutil, KeyMaterialProvider, KeySourceError};

use crate::common::JWKS_PATH;

async fn authority_returning(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

async fn fetch(server: &MockServer) -> Result<(), KeySourceError> {
    KeyMaterialProvider::new()
        .fetch(&format!("{}{}", server.uri(), JWKS_PATH))
        .await
        .map(|_| ())
}

#[test_log::test(tokio::test)]
async fn test_published_key_is_loaded() {
    let server =
        authority_returning(ResponseTemplate::new(200).set_body_json(testutil::jwks_json())).await;
    assert!(fetch(&server).await.is_ok());
}

#[test_log::test(tokio::test)]
async fn test_empty_key_set_produces_no_key() {
    let server = authority_returning(ResponseTemplate::new(200).set_body_json(json!({"keys": []}))).await;
    assert!(matches!(fetch(&server).await, Err(KeySourceError::EmptyKeySet)));
}

#[test_log::test(tokio::test)]
async fn test_authority_errors_are_fatal() {
    let server = authority_returning(ResponseTemplate::new(500)).await;
    assert!(matches!(
        fetch(&server).await,
        Err(KeySourceError::Http { status: 500 })
    ));

    let server = authority_returning(ResponseTemplate::new(200).set_body_string("<html/>")).await;
    assert!(matches!(fetch(&server).await, Err(KeySourceError::Malformed(_))));
}
