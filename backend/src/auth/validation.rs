//! Registration request rules.
//!
//! Every field reports only the first rule it breaks, so clients get one
//! actionable message per field.

use crate::auth::models::RegisterUserRequest;
use regex::Regex;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors};

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 30;
pub const MIN_PASSWORD_LENGTH: usize = 8;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("username pattern is valid"));

static PASSWORD_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("password pattern is valid"));

impl Validate for RegisterUserRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(error) = validate_username(&self.username) {
            errors.add("username", error);
        }

        if let Err(error) = validate_password(&self.password, &self.confirm_password) {
            errors.add("password", error);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(rule("required", "Username is required."));
    }

    let length = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        return Err(rule(
            "length",
            "Username must be between 3 and 30 characters.",
        ));
    }

    if !USERNAME_PATTERN.is_match(username) {
        return Err(rule(
            "pattern",
            "Username can only contain letters, numbers, and underscores.",
        ));
    }

    Ok(())
}

pub fn validate_password(password: &str, confirm_password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(rule("required", "Password is required."));
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(rule(
            "length",
            "Password must be at least 8 characters long.",
        ));
    }

    if !is_strong_password(password) {
        return Err(rule(
            "strength",
            "Password must contain at least one uppercase letter, one lowercase letter, and one number.",
        ));
    }

    if password != confirm_password {
        return Err(rule(
            "confirmation",
            "Password and confirmation do not match.",
        ));
    }

    Ok(())
}

/// ASCII letters and digits only, with at least one of each class.
fn is_strong_password(password: &str) -> bool {
    PASSWORD_CHARSET.is_match(password)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}
