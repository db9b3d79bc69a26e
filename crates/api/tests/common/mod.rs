#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use roofwatch_api::config::{ServerConfig, SimulatorConfig};
use roofwatch_api::router::build_app_router;
use roofwatch_api::state::{AppState, Stores};
use roofwatch_db::InMemoryStore;

/// Build a test `ServerConfig` with safe defaults and the simulator off.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        simulator: SimulatorConfig {
            enabled: false,
            interval: Duration::from_secs(30),
            iterations: 5,
        },
    }
}

/// Application state over a fresh in-memory store.
pub fn test_state(store: Arc<InMemoryStore>) -> AppState {
    AppState::new(test_config(), Stores::shared(store), None)
}

/// Build the full application router over `store`, with the same middleware
/// stack as production.
pub fn build_test_app(store: Arc<InMemoryStore>) -> (Router, AppState) {
    let state = test_state(store);
    let app = build_app_router(state.clone(), &test_config());
    (app, state)
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, "POST", uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, "PUT", uri, body).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
