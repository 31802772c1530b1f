//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use tripflow_backend::{app, auth::service::AuthSettings, config::Config, database::Database};

pub const STRONG_PASSWORD: &str = "Abc12345678";

/// Builds the application on a fresh in-memory database.
pub async fn create_test_app() -> Router {
    let mut config = Config::new("sqlite::memory:", b"integration-test-secret-of-32-bytes!".to_vec());
    // A second connection would open a second, empty in-memory database.
    config.max_connections = 1;
    config.bcrypt_cost = 4;

    let db = Database::new(&config)
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to migrate test database");

    app(db.pool().clone(), AuthSettings::from_config(&config))
}

/// Generate unique username for tests
pub fn unique_username(prefix: &str) -> String {
    let rand_id: u32 = rand::random();
    format!("{}_{}", prefix, rand_id % 100000)
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn cookie_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// All `Set-Cookie` header values of a response.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// `name=value` pair of the cookie called `name`, ready for a `Cookie` header.
pub fn cookie_pair(cookies: &[String], name: &str) -> Option<String> {
    cookies
        .iter()
        .filter_map(|cookie| cookie.split(';').next())
        .find(|pair| pair.starts_with(&format!("{}=", name)))
        .map(str::to_string)
}

pub async fn register(app: &Router, username: &str, password: &str) -> Response<Body> {
    let body = serde_json::json!({
        "username": username,
        "password": password,
        "confirmPassword": password,
    });
    send(app, json_request("POST", "/api/auth/register", &body)).await
}

pub async fn login(app: &Router, username: &str, password: &str) -> Response<Body> {
    let body = serde_json::json!({ "username": username, "password": password });
    send(app, json_request("POST", "/api/auth/login", &body)).await
}
