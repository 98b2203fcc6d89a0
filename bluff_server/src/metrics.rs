//! Prometheus metrics for monitoring game server health.
//!
//! Metrics are exposed in Prometheus text format on a dedicated listener,
//! enabled with `--metrics-bind` or `METRICS_BIND`. Without an installed
//! exporter every recording function is a no-op.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use bluff_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::websocket_connections_total();
//! metrics::rooms_active(3);
//! ```

use bluff::game::Verdict;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// WebSocket Metrics
// ============================================================================

/// Set current active WebSocket connections count.
pub fn websocket_connections_active(count: usize) {
    metrics::gauge!("websocket_connections_active").set(count as f64);
}

/// Increment total WebSocket connections counter.
pub fn websocket_connections_total() {
    metrics::counter!("websocket_connections_total").increment(1);
}

/// Increment WebSocket messages received counter.
pub fn websocket_messages_received(kind: &'static str) {
    metrics::counter!("websocket_messages_received", "type" => kind).increment(1);
}

// ============================================================================
// Game Metrics
// ============================================================================

/// Set current live rooms count.
pub fn rooms_active(count: usize) {
    metrics::gauge!("rooms_active").set(count as f64);
}

/// Increment rounds dealt counter.
pub fn games_started_total() {
    metrics::counter!("games_started_total").increment(1);
}

/// Increment rounds finished counter.
pub fn games_finished_total() {
    metrics::counter!("games_finished_total").increment(1);
}

/// Increment resolved challenges counter, labelled by verdict.
pub fn bluff_calls_total(result: Verdict) {
    metrics::counter!("bluff_calls_total",
        "result" => result.to_string()
    )
    .increment(1);
}

// ============================================================================
// Rate Limiting Metrics
// ============================================================================

/// Increment rate limit hits counter.
pub fn rate_limit_hits_total(window: &'static str) {
    metrics::counter!("rate_limit_hits_total", "window" => window).increment(1);
}
