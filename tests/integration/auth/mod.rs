//! Credential handling through the full router
//!
//! Opaque keys and signed tokens are forwarded to the Sandbox API unchanged;
//! every rejection is a generic 401 that never reaches the backend.

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use sandgate_auth::testutil;

use crate::common::{bearer, TestGateway, API_KEY_HEADER};

async fn mount_list(gateway: &TestGateway, authorization: &str) {
    Mock::given(method("GET"))
        .and(path("/SandboxGetRunningInstancesForUser"))
        .and(header("authorization", authorization))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"sandboxHashKey": "abc"}])))
        .expect(1)
        .mount(&gateway.backend)
        .await;
}

#[test_log::test(tokio::test)]
async fn test_opaque_key_is_forwarded_with_marker() {
    let gateway = TestGateway::new().await;
    mount_list(&gateway, "ApiKey sk-integration").await;

    let (status, body) = gateway.get("/list-sandboxes", Some(API_KEY_HEADER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"sandboxes": [{"sandboxHashKey": "abc"}]}));
}

#[test_log::test(tokio::test)]
async fn test_signed_token_is_forwarded_raw() {
    let gateway = TestGateway::new().await;
    let token = testutil::sign_rs256(&testutil::valid_claims());
    mount_list(&gateway, &token).await;

    let (status, _) = gateway.get("/list-sandboxes", Some(&bearer(&token))).await;
    assert_eq!(status, StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn test_rejected_credentials_are_generic_401() {
    let gateway = TestGateway::new().await;

    let mut expired = testutil::valid_claims();
    expired["exp"] = json!(testutil::now() - 60);
    let mut wrong_audience = testutil::valid_claims();
    wrong_audience["aud"] = json!("https://someone-else.example.com/");

    let headers = vec![
        None,
        Some("Basic dXNlcjpwYXNz".to_string()),
        Some(bearer(&testutil::encrypted_token())),
        Some(bearer(&testutil::sign_rs256(&expired))),
        Some(bearer(&testutil::sign_rs256(&wrong_audience))),
        Some(bearer(&testutil::sign_rs256_with_untrusted_key(
            &testutil::valid_claims(),
        ))),
        Some(bearer(&testutil::sign_hs256(
            &testutil::valid_claims(),
            testutil::TEST_HMAC_SECRET,
        ))),
        Some(bearer("not-a-token")),
    ];

    for authorization in headers {
        let (status, body) = gateway.get("/list-sandboxes", authorization.as_deref()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{:?}", authorization);
        assert_eq!(
            body,
            json!({"error": {"code": "UNAUTHORIZED", "message": "Unauthorized"}}),
            "{:?}",
            authorization
        );
    }

    assert!(gateway.backend_requests().await.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_health_needs_no_credentials() {
    let gateway = TestGateway::new().await;
    let response = gateway.get("/health", None).await;
    assert_eq!(response.0, StatusCode::OK);
}
