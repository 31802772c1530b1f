//! Data structures for authentication-related entities.
//!
//! This module defines request and response payloads for the auth endpoints
//! and the principal that tokens are issued for.

use crate::database::models::{PublicUser, User};
use crate::errors::FieldErrors;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Registration request payload
///
/// Rules live in `auth::validation`, which implements `Validate` for it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub password: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub confirm_password: String,
}

/// Login request payload
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Reads an explicit JSON `null` as an empty string, so it fails validation
/// like a missing field instead of failing deserialization.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthStatus {
    Success,
    Failure,
}

/// Body returned by every auth endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub status: AuthStatus,
    pub message: Option<String>,
    pub errors: Option<FieldErrors>,
    pub user: Option<PublicUser>,
}

impl AuthResponse {
    pub fn success(message: impl Into<String>, user: Option<PublicUser>) -> Self {
        Self {
            status: AuthStatus::Success,
            message: Some(message.into()),
            errors: None,
            user,
        }
    }

    pub fn failure(message: Option<String>, errors: Option<FieldErrors>) -> Self {
        Self {
            status: AuthStatus::Failure,
            message,
            errors,
            user: None,
        }
    }

    /// Failure carrying a single field error and no message.
    pub fn field_failure(field: &str, message: &str) -> Self {
        let errors = FieldErrors::from([(field.to_string(), message.to_string())]);
        Self::failure(None, Some(errors))
    }

    pub fn is_success(&self) -> bool {
        self.status == AuthStatus::Success
    }
}

/// Principal loaded from the user store: who tokens are issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDetails {
    pub username: String,
    pub hashed_password: String,
    pub authorities: Vec<String>,
}

impl From<&User> for UserDetails {
    fn from(user: &User) -> Self {
        UserDetails {
            username: user.username.clone(),
            hashed_password: user.hashed_password.clone(),
            authorities: vec![user.role.authority()],
        }
    }
}

/// Request extension set by the cookie filter for authenticated requests.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserDetails);

impl AuthenticatedUser {
    pub fn username(&self) -> &str {
        &self.0.username
    }
}

/// Body of the 401 returned for protected routes.
#[derive(Debug, Serialize, Deserialize)]
pub struct UnauthorizedResponse {
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}
