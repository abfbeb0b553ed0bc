//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt;

use webmail::api::{AppState, app};
use webmail::core::db::{async_db, initialize_db};
use webmail::core::{AppConfig, RuntimeMode};
use webmail::session::Sessions;

/// Config for a test app backed by an in-memory database.
pub fn test_config() -> AppConfig {
    AppConfig {
        host: String::from("127.0.0.1"),
        port: String::from("0"),
        database_url: String::from(":memory:"),
        session_cache_url: String::from("memory://"),
        web_url: String::from("*"),
        public_dir: String::from("./public"),
        mode: RuntimeMode::Development,
        rate_limit_window: Duration::from_secs(15 * 60),
        rate_limit_max: 1000,
    }
}

/// Creates a test application router with a fresh in-memory database
/// and session cache.
pub async fn test_app() -> Router {
    test_app_with(test_config()).await
}

pub async fn test_app_with(config: AppConfig) -> Router {
    let db = async_db(&config.database_url)
        .await
        .expect("Failed to connect to async db");
    db.call(|conn| {
        initialize_db(conn).expect("Failed to initialize db");
        Ok(())
    })
    .await
    .unwrap();

    let sessions = Sessions::from_url(&config.session_cache_url);
    let app_state = AppState::new(db, sessions, config);
    app(Arc::new(app_state))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_to_json(body: Body) -> Value {
    serde_json::from_str(&body_to_string(body).await).unwrap()
}

/// Build a JSON request, optionally with a bearer token
pub fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn register(app: &Router, email: &str, password: &str) -> Response<Body> {
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/register",
            serde_json::json!({ "email": email, "password": password }),
            None,
        ))
        .await
        .unwrap()
}

pub async fn login(app: &Router, email: &str, password: &str) -> Response<Body> {
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            serde_json::json!({ "email": email, "password": password }),
            None,
        ))
        .await
        .unwrap()
}

/// Register an account and log in, returning the session token
pub async fn register_and_login(app: &Router, email: &str, password: &str) -> String {
    let response = register(app, email, password).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = login(app, email, password).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    body["token"].as_str().unwrap().to_string()
}

pub async fn send_email(app: &Router, token: &str, to: &str, subject: &str) -> Response<Body> {
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/emails/send",
            serde_json::json!({ "to": to, "subject": subject, "body": "Hello there" }),
            Some(token),
        ))
        .await
        .unwrap()
}

pub async fn list_emails(app: &Router, token: &str) -> Response<Body> {
    app.clone()
        .oneshot(get_request("/api/emails", Some(token)))
        .await
        .unwrap()
}
