//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle registration, login, logout, token refreshing and the
//! current-user lookup. They are nested under `/api/auth` by the main router.

use crate::auth::handlers::*;
use crate::auth::middleware::require_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh", post(refresh_token))
        .route("/me", get(me).layer(middleware::from_fn(require_auth)))
}
