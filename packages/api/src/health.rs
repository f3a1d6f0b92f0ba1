// ABOUTME: Health check endpoint
// ABOUTME: Unauthenticated liveness probe reporting service name and version

use axum::Json;
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "usertags"
    }))
}
