//! HTTP/WebSocket API for the game server.
//!
//! # Endpoints
//!
//! - `GET /ws` - WebSocket carrying all game traffic (see [`websocket`])
//! - `GET /health` - Server health status
//!
//! # CORS
//!
//! CORS is configured permissively; browser clients are served from
//! arbitrary origins.

pub mod rate_limiter;
pub mod request_id;
pub mod websocket;

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Json},
    routing::get,
};
use bluff::RoomManager;
use serde_json::json;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers and WebSocket connections.
#[derive(Clone)]
pub struct AppState {
    pub room_manager: Arc<RoomManager>,
    /// Open WebSocket connections
    pub connections: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(room_manager: Arc<RoomManager>) -> Self {
        Self {
            room_manager,
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }
}

/// Create the API router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// # use bluff_server::api::{create_router, AppState};
/// # use bluff::RoomManager;
/// # use std::sync::Arc;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let state = AppState::new(Arc::new(RoomManager::default()));
/// let app = create_router(state);
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:4000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(websocket::websocket_handler))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// ```bash
/// curl http://localhost:4000/health
/// # {"status":"healthy","version":"0.1.0","rooms":2,"connections":5,"timestamp":"2026-01-01T10:30:00+00:00"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let rooms = state.room_manager.room_count().await;

    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "rooms": rooms,
        "connections": state.connections.load(Ordering::Relaxed),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
