#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use lumina_core::open_db_in_memory;
use lumina_server::{build_app_router, AppState, ServerConfig};
use serde_json::Value;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        db_path: ":memory:".into(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        log_level: "info".to_string(),
        log_dir: None,
    }
}

/// State over a fresh in-memory database.
pub fn test_state() -> AppState {
    AppState::new(open_db_in_memory().unwrap(), test_config())
}

/// Full application router over a fresh in-memory database.
pub fn build_test_app() -> Router {
    build_app_router(test_state())
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Creates a page through the API and returns its `data` payload.
pub async fn create_page(app: &Router, body: Value) -> Value {
    let response = post_json(app, "/api/pages", body).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"].clone()
}
