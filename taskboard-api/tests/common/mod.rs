//! Common test utilities for integration tests
//!
//! Every context gets its own in-memory store and a router built exactly as
//! the server builds it, so requests go through the full middleware stack.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::db::memory::MemoryStore;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: MemoryStore,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a context with an empty store and a cheap password cost
    pub fn new() -> anyhow::Result<Self> {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "memory://"),
            ("JWT_SECRET", TEST_SECRET),
            ("PASSWORD_HASH_COST", "1"),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))?;

        let store = MemoryStore::new();
        let state = AppState::new(Arc::new(store.clone()), config.clone());
        let app = build_router(state);

        Ok(TestContext { store, app, config })
    }

    /// Sends a request and returns the status and decoded JSON body
    ///
    /// An empty body decodes as `Value::Null`.
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
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_request(request).await
    }

    /// Sends a prebuilt request
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("non-JSON body ({}): {}", status, String::from_utf8_lossy(&bytes))
            })
        };

        (status, value)
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": email, "password": password, "name": name })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Registers a user and returns their token
    pub async fn register_user(&self, email: &str) -> String {
        let (status, body) = self.register(email, "password123", "Test User").await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        body["token"].as_str().unwrap().to_string()
    }

    /// Creates a task for the token's owner and returns its JSON
    pub async fn create_task(&self, token: &str, title: &str) -> Value {
        let (status, body) = self
            .send(Method::POST, "/api/tasks", Some(token), Some(json!({ "title": title })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);

        body["task"].clone()
    }
}
