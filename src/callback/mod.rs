//! Endpoints HipChat delivers webhook events to.
//!
//! Deliveries are acknowledged and logged; nothing else consumes them yet.

use axum::{extract::Path, http::StatusCode, Json};
use serde_json::Value;
use tracing::{info, instrument};

/// POST /api/notification/:room_id
#[instrument(skip(payload))]
pub async fn receive_notification(
    Path(room_id): Path<String>,
    Json(payload): Json<Value>,
) -> StatusCode {
    log_delivery("room_notification", &room_id, &payload);
    StatusCode::NO_CONTENT
}

/// POST /api/message/:room_id
#[instrument(skip(payload))]
pub async fn receive_message(
    Path(room_id): Path<String>,
    Json(payload): Json<Value>,
) -> StatusCode {
    log_delivery("room_message", &room_id, &payload);
    StatusCode::NO_CONTENT
}

fn log_delivery(endpoint: &str, room_id: &str, payload: &Value) {
    let event = payload
        .get("event")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    info!(endpoint, room_id = %room_id, event, "Received webhook delivery");
}
