//! Core business logic for the authentication system.
//!
//! Every operation resolves to an `AuthResponse` plus the cookies to set;
//! failures are folded into the response rather than returned as errors.

use crate::auth::cookies::{build_token_cookie, removal_cookie};
use crate::auth::models::*;
use crate::config::Config;
use crate::database::models::PublicUser;
use crate::errors::{FieldErrors, ServiceError, ServiceResult, first_field_errors};
use crate::services::user_service::UserService;
use crate::utils::jwt::{JwtUtils, TokenType};
use sqlx::SqlitePool;
use std::sync::Arc;
use validator::Validate;

/// Shared, immutable auth settings handed to handlers and middleware.
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_utils: Arc<JwtUtils>,
    pub bcrypt_cost: u32,
    pub cookie_secure: bool,
}

impl AuthSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            jwt_utils: Arc::new(JwtUtils::new(&config.jwt_secret)),
            bcrypt_cost: config.bcrypt_cost,
            cookie_secure: config.cookie_secure,
        }
    }
}

/// Response body plus `Set-Cookie` values produced by an operation.
#[derive(Debug)]
pub struct AuthOutcome {
    pub response: AuthResponse,
    pub cookies: Vec<String>,
}

impl AuthOutcome {
    fn body(response: AuthResponse) -> Self {
        Self {
            response,
            cookies: Vec::new(),
        }
    }
}

/// Authentication service for handling registration, login and token refresh
pub struct AuthService<'a> {
    settings: &'a AuthSettings,
    user_service: UserService<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    pub fn new(pool: &'a SqlitePool, settings: &'a AuthSettings) -> Self {
        AuthService {
            settings,
            user_service: UserService::new(pool, settings.bcrypt_cost),
        }
    }

    /// Validate the request and create the account.
    pub async fn register(&self, request: RegisterUserRequest) -> AuthOutcome {
        if let Err(validation_errors) = request.validate() {
            let errors = first_field_errors(&validation_errors);
            tracing::info!(fields = ?errors.keys().collect::<Vec<_>>(), "Registration rejected by validation");
            return AuthOutcome::body(AuthResponse::failure(None, Some(errors)));
        }

        let response = match self.user_service.register_user(&request).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, username = %user.username, "User registered");
                AuthResponse::success("Registration successful", Some(user))
            }
            Err(ServiceError::AlreadyExists { .. }) => {
                tracing::info!(username = %request.username, "Registration rejected: username taken");
                AuthResponse::field_failure("username", "User already exists with username")
            }
            Err(error) => {
                tracing::error!("Registration failed: {}", error);
                AuthResponse::field_failure("unexpected", "An error occurred during registration")
            }
        };

        AuthOutcome::body(response)
    }

    /// Check credentials and issue both tokens as cookies.
    pub async fn login(&self, request: LoginRequest) -> AuthOutcome {
        match self.try_login(&request).await {
            Ok(outcome) => {
                tracing::info!(username = %request.username, "Login successful");
                outcome
            }
            Err(error) => {
                if error.is_unexpected() {
                    tracing::error!("Login failed: {}", error);
                } else {
                    tracing::warn!(username = %request.username, "Login rejected: {}", error);
                }
                AuthOutcome::body(AuthResponse::failure(
                    Some("Invalid credentials".to_string()),
                    None,
                ))
            }
        }
    }

    async fn try_login(&self, request: &LoginRequest) -> ServiceResult<AuthOutcome> {
        request
            .validate()
            .map_err(|_| ServiceError::InvalidCredentials)?;

        let user = self
            .user_service
            .authenticate(&request.username, &request.password)
            .await?;

        let details = UserDetails::from(&user);
        let jwt = &self.settings.jwt_utils;
        let auth_token = jwt.generate_auth_token(&details)?;
        let refresh_token = jwt.generate_refresh_token(&details)?;

        let secure = self.settings.cookie_secure;
        Ok(AuthOutcome {
            response: AuthResponse::success("Login successful", Some(PublicUser::from(user))),
            cookies: vec![
                build_token_cookie(TokenType::AuthToken, &auth_token, secure),
                build_token_cookie(TokenType::RefreshToken, &refresh_token, secure),
            ],
        })
    }

    /// Clear both token cookies. Sessions are stateless, so nothing else to do.
    pub fn logout(&self) -> AuthOutcome {
        let secure = self.settings.cookie_secure;
        AuthOutcome {
            response: AuthResponse::success("Logout successful", None),
            cookies: vec![
                removal_cookie(TokenType::AuthToken, secure),
                removal_cookie(TokenType::RefreshToken, secure),
            ],
        }
    }

    /// Exchange a refresh token for a fresh auth token.
    pub async fn refresh(&self, refresh_token: &str) -> AuthOutcome {
        match self.try_refresh(refresh_token).await {
            Ok(outcome) => outcome,
            Err(error) => {
                if error.is_unexpected() {
                    tracing::error!("Token refresh failed: {}", error);
                } else {
                    tracing::warn!("Token refresh rejected: {}", error);
                }
                let errors = FieldErrors::from([(
                    "error".to_string(),
                    "Refresh token is invalid".to_string(),
                )]);
                AuthOutcome::body(AuthResponse::failure(
                    Some("Invalid refresh token".to_string()),
                    Some(errors),
                ))
            }
        }
    }

    async fn try_refresh(&self, refresh_token: &str) -> ServiceResult<AuthOutcome> {
        let jwt = &self.settings.jwt_utils;
        let claims = jwt.validate_token_of_type(refresh_token, TokenType::RefreshToken)?;

        let details = self.user_service.load_user_details(claims.username()).await?;
        let auth_token = jwt.generate_auth_token(&details)?;
        let user = self
            .user_service
            .get_public_user_by_username(&details.username)
            .await?;

        tracing::info!(username = %details.username, "Auth token refreshed");
        Ok(AuthOutcome {
            response: AuthResponse::success("Token refreshed successfully", Some(user)),
            cookies: vec![build_token_cookie(
                TokenType::AuthToken,
                &auth_token,
                self.settings.cookie_secure,
            )],
        })
    }

    /// Public profile of the authenticated caller.
    pub async fn current_user(&self, user: &AuthenticatedUser) -> ServiceResult<PublicUser> {
        self.user_service
            .get_public_user_by_username(user.username())
            .await
    }
}
