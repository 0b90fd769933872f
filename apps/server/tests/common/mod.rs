//! Shared helpers for server integration tests.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use moneta_server::api::app_router;
use moneta_server::build_state;
use moneta_server::config::Config;

pub struct TestApp {
    pub router: Router,
    // Held so the database directory outlives the test.
    _dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Builds the full application against a throwaway database, with no Redis
/// (memory cache), no mail, and no insight provider (rule-based fallback).
pub async fn spawn_app_with(mutate: impl FnOnce(&mut Config)) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config {
        listen_addr: "127.0.0.1:0".to_string(),
        db_path: dir
            .path()
            .join("test.db")
            .to_str()
            .unwrap()
            .to_string(),
        redis_url: None,
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expiry_secs: 3600,
        mail: None,
        insights: None,
        auth_rate_limit: None,
    };
    mutate(&mut config);

    let state = build_state(&config).await.unwrap();
    TestApp {
        router: app_router(state, &config),
        _dir: dir,
    }
}

/// Sends one request through the router and returns (status, parsed body).
pub async fn request(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub async fn get(router: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    request(router, Method::GET, uri, Some(token), None).await
}

pub async fn post(
    router: &Router,
    uri: &str,
    token: &str,
    body: Value,
) -> (StatusCode, Value) {
    request(router, Method::POST, uri, Some(token), Some(body)).await
}

/// Registers the canonical test user and returns a bearer token.
pub async fn signup_and_login(router: &Router) -> String {
    let (status, _) = request(
        router,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "fullName": "John Doe",
            "email": "john@x.com",
            "password": "password123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        router,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "john@x.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}
