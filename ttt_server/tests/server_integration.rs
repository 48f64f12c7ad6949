//! Integration tests for the HTTP surface of the server.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use std::sync::Arc;
use tictactoe::{Gateway, SessionRegistry};
use tower::ServiceExt; // For `oneshot` method
use ttt_server::api::{AppState, create_router};
use ttt_server::config::RateLimitConfig;

fn create_test_server() -> (axum::Router, Arc<SessionRegistry>) {
    let registry = Arc::new(SessionRegistry::default());
    let state = AppState::new(Gateway::new(registry.clone()), RateLimitConfig::default());
    (create_router(state), registry)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let (app, _) = create_test_server();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["sessions"], 0);
    assert_eq!(json["connections"], 0);
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_check_counts_sessions() {
    let (app, registry) = create_test_server();
    registry.create().await;
    registry.create().await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let json = body_json(response).await;
    assert_eq!(json["sessions"], 2);
}

// ============================================================================
// Routing Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let (app, _) = create_test_server();

    let request = Request::builder()
        .uri("/api/games")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_websocket_route_requires_upgrade() {
    let (app, _) = create_test_server();

    let request = Request::builder().uri("/ws").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(
        response.status().is_client_error(),
        "plain GET on /ws should be rejected, got {}",
        response.status()
    );
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (app, _) = create_test_server();

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
