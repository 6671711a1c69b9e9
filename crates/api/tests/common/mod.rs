use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use ordercast_api::config::ServerConfig;
use ordercast_api::router::build_app_router;
use ordercast_api::state::AppState;
use ordercast_api::ws::WsManager;
use ordercast_dispatch::{Dispatcher, PushTransport};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        push_timeout_secs: 3,
        reaper_interval_secs: 300,
        reaper_stale_after_secs: None,
    }
}

/// A fully wired application for integration tests.
///
/// `ws_manager` is the same instance the dispatcher pushes through, so tests
/// can register live channels and observe delivered frames.
pub struct TestApp {
    pub router: Router,
    pub ws_manager: Arc<WsManager>,
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the wiring in `main.rs` (same `build_app_router`) so
/// integration tests exercise the same middleware stack that production uses.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let config = test_config();
    let ws_manager = Arc::new(WsManager::new());
    let transport: Arc<dyn PushTransport> = Arc::clone(&ws_manager) as Arc<dyn PushTransport>;
    let dispatcher = Arc::new(Dispatcher::new(pool.clone(), transport));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        dispatcher,
    };

    TestApp {
        router: build_app_router(state, &config),
        ws_manager,
    }
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a request with a JSON body against the app.
pub async fn request_json(
    app: Router,
    method: Method,
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

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
