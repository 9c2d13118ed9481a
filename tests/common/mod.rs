#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use twitter_clone::auth::{PasswordHasher, TokenService};
use twitter_clone::database::MemoryStore;
use twitter_clone::server::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Lowest bcrypt cost keeps the suite fast
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_state() -> AppState {
    AppState::new(
        Arc::new(MemoryStore::new()),
        TokenService::new(TEST_SECRET, 3600).expect("test secret is non-empty"),
        PasswordHasher::new(TEST_BCRYPT_COST),
    )
}

/// In-process server: the full router over a fresh in-memory store.
#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let state = test_state();
        Self {
            router: app(state.clone()),
            state,
        }
    }

    pub async fn api(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        if let Some(token) = token {
            builder = builder.header("x-auth-token", token);
        }
        let body = match body {
            Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
            None => Body::empty(),
        };

        let req = builder.body(body).unwrap();
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let json = if bytes.is_empty() {
            json!(null)
        } else {
            serde_json::from_slice(&bytes).unwrap_or(json!(null))
        };
        (status, json)
    }

    pub async fn register(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .api("POST", "/api/users", None, Some(json!({ "email": email, "password": password })))
            .await;
        assert_eq!(status, StatusCode::OK, "register {}: {}", email, body);
        body["token"].as_str().expect("token in register response").to_string()
    }

    pub async fn create_profile(&self, token: &str, name: &str) -> Value {
        let (status, body) = self
            .api("POST", "/api/profile", Some(token), Some(json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::OK, "create profile: {}", body);
        body
    }

    pub async fn post_tweet(&self, token: &str, text: &str) -> Value {
        let (status, body) = self
            .api("POST", "/api/tweets", Some(token), Some(json!({ "text": text })))
            .await;
        assert_eq!(status, StatusCode::OK, "post tweet: {}", body);
        body
    }

    /// User id carried by a token this app issued
    pub fn user_id(&self, token: &str) -> String {
        self.state.tokens.verify(token).unwrap().user.id.to_string()
    }
}

/// Real listener on a free port, for tests that go through reqwest.
pub struct TestServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let router = app(test_state());

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            handle,
        })
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
