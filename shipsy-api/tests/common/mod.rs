/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - An app wired to a fresh in-memory store, built as it is served
/// - User signup and login helpers
/// - A request helper returning status and parsed JSON body

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use shipsy_api::app::{build_app, AppState};
use shipsy_api::config::Config;
use shipsy_shared::store::memory::InMemoryStore;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::normalize_path::NormalizePath;

pub const TEST_SECRET: &str = "integration-test-secret-key-32-bytes-min";

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: NormalizePath<Router>,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context with an empty in-memory store
    pub fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some(TEST_SECRET.to_string()),
            _ => None,
        })
        .expect("test config");

        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(config.clone(), store.clone(), store);
        let app = build_app(state);

        TestContext { app, config }
    }

    /// Sends a request and returns status plus JSON body (Null if empty or not JSON)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// Sends a prebuilt request
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }

    /// Registers a user and returns the signup response body
    pub async fn signup(&self, username: &str, password: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/signup",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
        body
    }

    /// Logs in and returns the session token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        body["token"].as_str().expect("token in login response").to_string()
    }

    /// Signs up and logs in, returning the session token
    pub async fn register(&self, username: &str, password: &str) -> String {
        self.signup(username, password).await;
        self.login(username, password).await
    }
}
