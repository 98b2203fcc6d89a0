//! Integration tests for the HTTP surface of the server.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use bluff::{RoomManager, entities::ConnectionId};
use bluff_server::api::{AppState, create_router, request_id::REQUEST_ID_HEADER};
use http_body_util::BodyExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::ServiceExt; // For `oneshot` method

fn create_test_server() -> (axum::Router, Arc<RoomManager>) {
    let room_manager = Arc::new(RoomManager::default());
    let app = create_router(AppState::new(room_manager.clone()));
    (app, room_manager)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
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
    assert_eq!(json["rooms"], 0);
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_counts_rooms() {
    let (app, manager) = create_test_server();
    let (tx, _rx) = mpsc::channel(16);
    manager
        .create_room(None, ConnectionId::new(), "alice".into(), tx)
        .await
        .unwrap();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let json = body_json(response).await;
    assert_eq!(json["rooms"], 1);
}

// ============================================================================
// Middleware Tests
// ============================================================================

#[tokio::test]
async fn test_request_id_generated() {
    let (app, _) = create_test_server();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let request_id = response.headers().get(REQUEST_ID_HEADER).unwrap();
    assert!(!request_id.is_empty());
}

#[tokio::test]
async fn test_request_id_propagated() {
    let (app, _) = create_test_server();

    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "trace-me-42")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], "trace-me-42");
}

#[tokio::test]
async fn test_cors_headers_present() {
    let (app, _) = create_test_server();

    let request = Request::builder()
        .uri("/health")
        .header("origin", "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

// ============================================================================
// Routing Tests
// ============================================================================

#[tokio::test]
async fn test_websocket_requires_upgrade() {
    let (app, _) = create_test_server();

    let request = Request::builder().uri("/ws").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _) = create_test_server();

    let request = Request::builder()
        .uri("/api/tables")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
