//! Integration tests for health, landing and static form endpoints.

mod common;

use axum::http::StatusCode;
use common::{get_request, parse_response_body, response_text, test_config, TestApp};
use meeting_invite_api::middleware::init_metrics;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_reports_store_status() {
    let test = TestApp::new();

    let response = test.app.clone().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["ok"], true);
    assert!(body["time"].is_string());
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["store"]["connected"], true);
    assert_eq!(body["mailer"]["provider"], "mock");

    test.store.set_available(false);
    let response = test.app.clone().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["store"]["connected"], false);
}

#[tokio::test]
async fn test_ready_follows_store() {
    let test = TestApp::new();

    let response = test
        .app
        .clone()
        .oneshot(get_request("/health/ready"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    test.store.set_available(false);
    let response = test
        .app
        .clone()
        .oneshot(get_request("/health/ready"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_root_serves_usage_hint() {
    let test = TestApp::new();

    let response = test.app.clone().oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert!(response_text(response).await.contains("POST /register"));
}

#[tokio::test]
async fn test_static_dir_serves_form() {
    let dir = std::env::temp_dir().join(format!("meeting-invite-static-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<form id=\"register\"></form>").unwrap();
    std::fs::write(dir.join("app.js"), "console.log('form');").unwrap();

    let mut config = test_config();
    config.server.static_dir = Some(dir.to_string_lossy().to_string());
    let test = TestApp::with_config(config);

    let index = test.app.clone().oneshot(get_request("/")).await.unwrap();
    assert_eq!(index.status(), StatusCode::OK);
    assert!(response_text(index).await.contains("id=\"register\""));

    let script = test.app.clone().oneshot(get_request("/app.js")).await.unwrap();
    assert_eq!(script.status(), StatusCode::OK);
    assert!(response_text(script).await.contains("console.log"));

    let missing = test
        .app
        .clone()
        .oneshot(get_request("/missing.css"))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_unknown_route_is_404_without_static_dir() {
    let test = TestApp::new();
    let response = test
        .app
        .clone()
        .oneshot(get_request("/nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_endpoint_renders_request_counters() {
    tokio_test::assert_ok!(init_metrics());
    let test = TestApp::new();

    let response = test.app.clone().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = test
        .app
        .clone()
        .oneshot(get_request("/metrics"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = response_text(response).await;
    assert!(text.contains("http_requests_total"));
    assert!(text.contains("path=\"/health\""));
}
