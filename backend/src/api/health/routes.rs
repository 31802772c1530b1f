//! Defines the public health-check routes.

use super::handlers::health_check;
use axum::{Router, routing::get};

/// Answers on both `/api/health` and `/api/health/`.
pub fn health_router() -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/health/", get(health_check))
}
