//! Shared helpers for the HTTP-level tests: router construction, token minting, request plumbing.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{json, Value};
use sideboard::{app, AppState, AuthConfig, AuthKey, Authenticator, DEFAULT_BODY_LIMIT};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tower::ServiceExt;

pub const SECRET: &str = "sideboard-test-secret";
pub const AUDIENCE: &str = "sideboard";

pub fn auth_config(audience: Option<&str>) -> AuthConfig {
    AuthConfig {
        key: AuthKey::Secret(SECRET.into()),
        issuer: None,
        audience: audience.map(str::to_string),
    }
}

/// Router over a pool that never connects until a handler touches the store.
pub fn offline_app() -> Router {
    offline_app_with(auth_config(None))
}

pub fn offline_app_with(auth: AuthConfig) -> Router {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy("postgres://sideboard@127.0.0.1:1/sideboard_offline")
        .expect("lazy pool");
    build(pool, auth)
}

pub fn app_with_pool(pool: PgPool) -> Router {
    build(pool, auth_config(None))
}

fn build(pool: PgPool, auth: AuthConfig) -> Router {
    let authenticator = Authenticator::new(&auth).expect("authenticator");
    app(AppState::new(pool, authenticator), DEFAULT_BODY_LIMIT)
}

fn now() -> u64 {
    jsonwebtoken::get_current_timestamp()
}

/// HS256 token for arbitrary claims.
pub fn sign(claims: &Value) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("sign token")
}

/// Valid for an hour, carrying the given permissions.
pub fn token(permissions: &[&str]) -> String {
    sign(&json!({
        "sub": "tester",
        "permissions": permissions,
        "exp": now() + 3600,
    }))
}

/// Every permission the API knows about.
pub fn admin_token() -> String {
    let all: Vec<&str> = sideboard::auth::permissions::ALL.to_vec();
    token(&all)
}

pub fn expired_token(permissions: &[&str]) -> String {
    sign(&json!({
        "permissions": permissions,
        "exp": now() - 3600,
    }))
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = bearer {
        req = req.header("authorization", format!("Bearer {}", t));
    }
    let req = match body {
        Some(b) => req
            .header("content-type", "application/json")
            .body(Body::from(b.to_string())),
        None => req.body(Body::empty()),
    }
    .expect("request");
    let resp = app.clone().oneshot(req).await.expect("response");
    let status = resp.status();
    let bytes = resp.into_body().collect().await.expect("body").to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    bearer: &str,
    body: &Value,
) -> (StatusCode, Value) {
    send(app, method, uri, Some(bearer), Some(&body.to_string())).await
}

/// Asserts the failure envelope and returns its message.
pub fn assert_failure(body: &Value, status: StatusCode) -> String {
    assert_eq!(body["success"], json!(false), "body: {}", body);
    assert_eq!(body["status"], json!(status.as_u16()), "body: {}", body);
    assert_eq!(
        body["error"],
        json!(status.canonical_reason().unwrap_or_default()),
        "body: {}",
        body
    );
    body["message"].as_str().unwrap_or_default().to_string()
}
