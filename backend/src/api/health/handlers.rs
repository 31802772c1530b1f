//! Liveness probe handler.

use axum::response::Json;
use serde_json::{Value, json};

/// Reports that the service is up. Touches nothing else.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}
