use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use equipay_backend::{api_router, config, database, AppState};

/// Integration tests need a PostgreSQL instance; they skip themselves when
/// DATABASE_URL is unset.
pub fn test_database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

/// Create a test application instance against the configured database
pub async fn create_test_app(db_url: &str) -> Router {
    std::env::set_var("LOG_LEVEL", "error");

    let test_config =
        config::Settings::new_with_env_file(false).expect("Failed to create test config");

    let pool = database::create_connection_pool(db_url)
        .await
        .expect("Failed to create database pool");

    let app_state = AppState::new_with_pool(test_config, pool)
        .await
        .expect("Failed to create test app state");

    api_router(app_state)
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send, assert the status, and return the parsed body in one step
pub async fn request_expect(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    expected: StatusCode,
) -> Value {
    let response = send_json(app, method, uri, body).await;
    let status = response.status();
    let json = json_body(response).await;
    assert_eq!(status, expected, "unexpected status for {method} {uri}: {json}");
    json
}
