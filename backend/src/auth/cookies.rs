//! Token cookie construction and parsing.
//!
//! Tokens travel as `HttpOnly` cookies scoped to `/`. Removal is done by
//! re-sending the cookie empty with `Max-Age=0`.

use crate::utils::jwt::TokenType;
use axum::http::{HeaderMap, header::COOKIE};

/// `Set-Cookie` value carrying `token`, living as long as the token does.
pub fn build_token_cookie(token_type: TokenType, token: &str, secure: bool) -> String {
    format_cookie(
        token_type.cookie_name(),
        token,
        token_type.duration().num_seconds(),
        secure,
    )
}

/// `Set-Cookie` value that clears the cookie for `token_type`.
pub fn removal_cookie(token_type: TokenType, secure: bool) -> String {
    format_cookie(token_type.cookie_name(), "", 0, secure)
}

fn format_cookie(name: &str, value: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!("{}={}; Max-Age={}; Path=/; HttpOnly", name, value, max_age);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Value of the first cookie called `name` across all `Cookie` headers.
pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
}
