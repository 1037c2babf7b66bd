//! Shared helpers for tests.

use axum::http::StatusCode;
use axum_test::TestServer;
use base64::{Engine as _, engine::general_purpose};
use sqlx::PgPool;

use crate::{AppState, build_router, config::Config};

/// A configuration that passes validation without touching the environment.
pub fn create_test_config() -> Config {
    Config {
        secret_key: Some("test-secret-key".to_string()),
        encryption_key: Some(general_purpose::STANDARD.encode([0u8; 32])),
        ..Config::default()
    }
}

/// Full router over the given pool, wrapped in a test server.
pub async fn create_test_server(pool: PgPool) -> TestServer {
    let state = AppState::builder().db(pool).config(create_test_config()).build();
    let router = build_router(state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to create test server")
}

/// Register a user with the stock test password and return their session
/// token.
pub async fn register_user(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/user/register")
        .json(&serde_json::json!({
            "email": email,
            "password": "Abc12345!",
            "passwordCheck": "Abc12345!"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    body["accessToken"].as_str().expect("access token in response").to_string()
}
