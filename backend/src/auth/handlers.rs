//! Handler functions for authentication-related API endpoints.
//!
//! These functions parse incoming requests, delegate to `auth::service` and
//! translate the outcome into a status code, `Set-Cookie` headers and a JSON body.

use crate::auth::models::*;
use crate::auth::service::{AuthOutcome, AuthService, AuthSettings};
use crate::errors::{FieldErrors, ServiceError};
use crate::utils::jwt::{TokenType, token_from_cookies};
use axum::{
    extract::{Extension, Json},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Response},
};
use sqlx::SqlitePool;

fn outcome_response(outcome: AuthOutcome, success: StatusCode, failure: StatusCode) -> Response {
    let status = if outcome.response.is_success() {
        success
    } else {
        failure
    };

    let cookies = outcome
        .cookies
        .into_iter()
        .map(|cookie| (SET_COOKIE, cookie));

    (status, AppendHeaders(cookies), Json(outcome.response)).into_response()
}

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(settings): Extension<AuthSettings>,
    Json(payload): Json<RegisterUserRequest>,
) -> Response {
    let auth_service = AuthService::new(&pool, &settings);
    let outcome = auth_service.register(payload).await;
    outcome_response(outcome, StatusCode::CREATED, StatusCode::BAD_REQUEST)
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(settings): Extension<AuthSettings>,
    Json(payload): Json<LoginRequest>,
) -> Response {
    let auth_service = AuthService::new(&pool, &settings);
    let outcome = auth_service.login(payload).await;
    outcome_response(outcome, StatusCode::OK, StatusCode::UNAUTHORIZED)
}

/// Handle logout request by expiring both token cookies
#[axum::debug_handler]
pub async fn logout(
    Extension(pool): Extension<SqlitePool>,
    Extension(settings): Extension<AuthSettings>,
) -> Response {
    let auth_service = AuthService::new(&pool, &settings);
    outcome_response(
        auth_service.logout(),
        StatusCode::OK,
        StatusCode::BAD_REQUEST,
    )
}

/// Handle token refresh request using the `refresh_token` cookie
#[axum::debug_handler]
pub async fn refresh_token(
    Extension(pool): Extension<SqlitePool>,
    Extension(settings): Extension<AuthSettings>,
    headers: HeaderMap,
) -> Response {
    let Some(refresh_token) = token_from_cookies(&headers, TokenType::RefreshToken) else {
        let errors = FieldErrors::from([(
            TokenType::RefreshToken.cookie_name().to_string(),
            "Refresh token cookie is required".to_string(),
        )]);
        let response = AuthResponse::failure(Some("Missing refresh token".to_string()), Some(errors));
        return (StatusCode::BAD_REQUEST, Json(response)).into_response();
    };

    let auth_service = AuthService::new(&pool, &settings);
    let outcome = auth_service.refresh(&refresh_token).await;
    outcome_response(outcome, StatusCode::OK, StatusCode::UNAUTHORIZED)
}

/// Get current user information from the authenticated principal
#[axum::debug_handler]
pub async fn me(
    Extension(pool): Extension<SqlitePool>,
    Extension(settings): Extension<AuthSettings>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Response {
    let auth_service = AuthService::new(&pool, &settings);

    match auth_service.current_user(&user).await {
        Ok(public_user) => (
            StatusCode::OK,
            Json(AuthResponse::success("User retrieved successfully", Some(public_user))),
        )
            .into_response(),
        Err(ServiceError::NotFound { .. }) => (
            StatusCode::NOT_FOUND,
            Json(AuthResponse::failure(Some("User not found".to_string()), None)),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Failed to load current user: {}", error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AuthResponse::failure(
                    Some("Internal server error".to_string()),
                    None,
                )),
            )
                .into_response()
        }
    }
}
