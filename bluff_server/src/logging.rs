//! Structured logging configuration.
//!
//! The game library logs through the `log` facade; those records are
//! forwarded into the tracing subscriber installed here, so one `RUST_LOG`
//! filter governs both.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparseable
pub const DEFAULT_FILTER: &str = "info,tower_http=warn";

/// Initialize structured logging
///
/// # Example
///
/// ```no_run
/// use bluff_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a room lifecycle event with structured data
///
/// # Arguments
///
/// * `event` - Event name (`created`, `joined`, `started`, `left`, ...)
/// * `room_id` - Room the event belongs to
/// * `detail` - Free-form detail, usually the player involved
///
/// # Example
///
/// ```
/// use bluff_server::logging::log_room_event;
///
/// log_room_event("joined", "abc123", "bob (p_1a2b3c4d)");
/// ```
pub fn log_room_event(event: &str, room_id: &str, detail: &str) {
    tracing::info!(event = event, room_id = room_id, "ROOM: {}", detail);
}

/// Log a rejected client request
pub fn log_rejected_request(request: &str, connection_id: &str, reason: &str) {
    tracing::debug!(
        request = request,
        connection_id = connection_id,
        reason = reason,
        "Request rejected"
    );
}
