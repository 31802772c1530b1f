//! TripFlow backend library.
//!
//! Username/password authentication with stateless, cookie-carried JWTs:
//! registration, login, logout and token refresh, plus a health probe.
//! `main.rs` wires configuration and the database into [`app`].

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod utils;

use crate::auth::service::AuthSettings;
use axum::{Extension, Router, middleware};
use sqlx::SqlitePool;

/// Builds the application router with all routes and shared layers.
pub fn app(pool: SqlitePool, settings: AuthSettings) -> Router {
    Router::new()
        .merge(api::health::routes::health_router())
        .nest("/api/auth", auth::routes::auth_router())
        .layer(middleware::from_fn(auth::middleware::jwt_cookie_auth))
        .layer(Extension(settings))
        .layer(Extension(pool))
}
