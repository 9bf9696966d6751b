//! Retry behavior against a real HTTP backend
//!
//! These tests sleep through genuine backoff delays (one to two seconds per
//! retry).

use std::time::Instant;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{config_for, fetch_key, TestGateway, API_KEY_HEADER};

#[test_log::test(tokio::test)]
async fn test_transient_failures_recover() {
    let gateway = TestGateway::new().await;
    Mock::given(method("POST"))
        .and(path("/SandboxRunInstance"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&gateway.backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/SandboxRunInstance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sandboxHashKey": "abc"})))
        .expect(1)
        .mount(&gateway.backend)
        .await;

    let started = Instant::now();
    let (status, body) = gateway
        .post("/start-sandbox", Some(API_KEY_HEADER), json!({"usecase": "movies"}))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["sandboxHashKey"], "abc");
    // Two waits: [1.0, 1.5) + [2.0, 2.5)
    assert!(started.elapsed().as_secs_f64() >= 3.0);
}

#[test_log::test(tokio::test)]
async fn test_exhausted_retries_echo_backend_status() {
    let gateway = TestGateway::new().await;
    Mock::given(method("GET"))
        .and(path("/SandboxBackup/abc"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "maintenance at db-7"})))
        .expect(3)
        .mount(&gateway.backend)
        .await;

    let (status, body) = gateway.get("/list-backups/abc", Some(API_KEY_HEADER)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
    assert!(!body.to_string().contains("db-7"));
}

#[test_log::test(tokio::test)]
async fn test_client_fault_is_not_retried() {
    let gateway = TestGateway::new().await;
    Mock::given(method("POST"))
        .and(path("/SandboxStopInstance"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "No running instance"})))
        .expect(1)
        .mount(&gateway.backend)
        .await;

    let started = Instant::now();
    let (status, body) = gateway
        .post(
            "/terminate-sandbox",
            Some(API_KEY_HEADER),
            json!({"sandbox_hash_key": "abc"}),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Upstream error: No running instance");
    assert!(started.elapsed().as_secs_f64() < 1.0);
}

#[test_log::test(tokio::test)]
async fn test_accepted_without_body_is_empty_object() {
    let gateway = TestGateway::new().await;
    Mock::given(method("POST"))
        .and(path("/SandboxBackup/request/abc"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&gateway.backend)
        .await;

    let (status, body) = gateway
        .post("/request-backup/abc", Some(API_KEY_HEADER), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[test_log::test(tokio::test)]
async fn test_unreachable_backend_surfaces_503() {
    let gateway = TestGateway::new().await;
    let app = sandgate_app::create_app(
        &config_for("http://127.0.0.1:9"),
        fetch_key(&gateway.authority).await,
    )
    .unwrap();
    let gateway = TestGateway { app, ..gateway };

    let (status, _) = gateway.get("/list-sandboxes", Some(API_KEY_HEADER)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
