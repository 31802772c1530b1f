//! Middleware for authenticating requests from the token cookie.
//!
//! `jwt_cookie_auth` runs on every request and only attaches the principal
//! when the `auth_token` cookie checks out. `require_auth` guards protected
//! routes and answers 401 when no principal was attached.

use crate::auth::models::{AuthenticatedUser, UnauthorizedResponse};
use crate::auth::service::AuthSettings;
use crate::services::user_service::UserService;
use crate::utils::jwt::{TokenType, token_from_cookies};
use axum::{
    Json,
    extract::{Extension, OriginalUri, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;

pub const UNAUTHORIZED_MESSAGE: &str = "Full authentication is required to access this resource";

/// Cookie authentication filter (never rejects)
pub async fn jwt_cookie_auth(
    Extension(pool): Extension<SqlitePool>,
    Extension(settings): Extension<AuthSettings>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = token_from_cookies(request.headers(), TokenType::AuthToken) else {
        return next.run(request).await;
    };

    let claims = match settings
        .jwt_utils
        .validate_token_of_type(&token, TokenType::AuthToken)
    {
        Ok(claims) => claims,
        Err(error) => {
            tracing::debug!("Ignoring auth cookie: {}", error);
            return next.run(request).await;
        }
    };

    // The account may have been removed since the token was issued.
    let user_service = UserService::new(&pool, settings.bcrypt_cost);
    match user_service.load_user_details(claims.username()).await {
        Ok(details) => {
            request.extensions_mut().insert(AuthenticatedUser(details));
        }
        Err(error) if error.is_unexpected() => {
            tracing::error!("Failed to load user for auth cookie: {}", error);
        }
        Err(error) => {
            tracing::debug!("Auth cookie subject not usable: {}", error);
        }
    }

    next.run(request).await
}

/// Rejects requests that `jwt_cookie_auth` did not authenticate.
pub async fn require_auth(request: Request, next: Next) -> Response {
    if request.extensions().get::<AuthenticatedUser>().is_some() {
        return next.run(request).await;
    }

    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    tracing::debug!(%path, "Unauthenticated request to protected route");

    let body = UnauthorizedResponse {
        status: StatusCode::UNAUTHORIZED.as_u16(),
        error: "Unauthorized".to_string(),
        message: UNAUTHORIZED_MESSAGE.to_string(),
        path,
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
