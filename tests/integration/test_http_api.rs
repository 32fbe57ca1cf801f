#[path = "../common/mod.rs"]
mod common;

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use brandcheck::server::{build_router, AppState};
use common::{analysis_json, anthropic_reply, fenced, orchestrator_for, recommendations_json, CONTENT};
use mockito::Server;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(base_url: &str, configured: &[&str]) -> Router {
    build_router(AppState::new(orchestrator_for(
        base_url,
        configured,
        Duration::from_secs(30),
    )))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<String>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app("http://127.0.0.1:9", &[]), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_list_providers() {
    let (status, body) = send(app("http://127.0.0.1:9", &["gemini"]), "GET", "/api/providers", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": "anthropic", "model": "claude-3-7-sonnet-latest", "configured": false },
            { "id": "openai", "model": "gpt-4o", "configured": false },
            { "id": "gemini", "model": "gemini-2.5-pro", "configured": true }
        ])
    );
}

#[tokio::test]
async fn test_analyze_success_defaults_to_anthropic() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(anthropic_reply(&fenced(&analysis_json())))
        .expect(1)
        .create_async()
        .await;

    let body = json!({ "content": CONTENT, "platform": "social" }).to_string();
    let (status, body) = send(app(&server.url(), &["anthropic"]), "POST", "/api/analyze", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overall"]["score"], 60);
    assert_eq!(body["targetAudience"]["primaryAudience"]["type"], "The Disenfranchised Buyer");
    assert!(body.get("contentRecommendations").is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_blank_content_is_bad_request() {
    let body = json!({ "content": "   ", "platform": "social" }).to_string();
    let (status, body) = send(app("http://127.0.0.1:9", &["anthropic"]), "POST", "/api/analyze", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_request");
    assert!(body["error"].as_str().unwrap().contains("Content"));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (status, body) = send(
        app("http://127.0.0.1:9", &["anthropic"]),
        "POST",
        "/api/analyze",
        Some("{ not json".to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_request");
}

#[tokio::test]
async fn test_unknown_provider_is_bad_request() {
    let body = json!({ "content": CONTENT, "platform": "social", "provider": "mistral" }).to_string();
    let (status, body) = send(app("http://127.0.0.1:9", &["anthropic"]), "POST", "/api/analyze", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("mistral"));
}

#[tokio::test]
async fn test_unconfigured_provider_is_service_unavailable() {
    let body = json!({ "content": CONTENT, "platform": "social", "provider": "openai" }).to_string();
    let (status, body) = send(app("http://127.0.0.1:9", &["anthropic"]), "POST", "/api/analyze", Some(body)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "provider_not_configured");
    assert!(body["error"].as_str().unwrap().contains("OPENAI_API_KEY"));
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(500)
        .with_body(json!({ "type": "error", "error": { "type": "api_error", "message": "Internal server error" } }).to_string())
        .create_async()
        .await;

    let body = json!({ "content": CONTENT, "platform": "social" }).to_string();
    let (status, body) = send(app(&server.url(), &["anthropic"]), "POST", "/api/analyze", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "provider_invocation");
}

#[tokio::test]
async fn test_unparsable_completion_is_bad_gateway() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(anthropic_reply("I cannot analyze this"))
        .create_async()
        .await;

    let body = json!({ "content": CONTENT, "platform": "social" }).to_string();
    let (status, body) = send(app(&server.url(), &["anthropic"]), "POST", "/api/analyze", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "unparsable_response");
    // raw completion stays in the logs, not the response
    assert!(!body["error"].as_str().unwrap().contains("I cannot analyze this"));
}

#[tokio::test]
async fn test_recommendations_require_analysis() {
    let body = json!({ "content": CONTENT, "platform": "social" }).to_string();
    let (status, body) = send(
        app("http://127.0.0.1:9", &["anthropic"]),
        "POST",
        "/api/recommendations",
        Some(body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_request");
}

#[tokio::test]
async fn test_recommendations_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(anthropic_reply(&recommendations_json().to_string()))
        .expect(1)
        .create_async()
        .await;

    let body = json!({
        "content": CONTENT,
        "platform": "social",
        "analysis": analysis_json(),
        "provider": "anthropic"
    })
    .to_string();
    let (status, body) = send(app(&server.url(), &["anthropic"]), "POST", "/api/recommendations", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    let recommendations = body.as_array().unwrap();
    assert_eq!(recommendations.len(), 2);
    assert_eq!(recommendations[0]["examples"].as_array().unwrap().len(), 1);
    assert_eq!(recommendations[0]["examples"][0]["original"], "Buy our platform now");
    mock.assert_async().await;
}
