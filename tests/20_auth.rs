mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::TestApp;
use twitter_clone::auth::{avatar_url, Claims, TokenService};

#[tokio::test]
async fn login_with_correct_credentials_returns_token() {
    let app = TestApp::new();
    let registered = app.register("a@x.com", "secret1").await;

    let (status, body) = app
        .api("POST", "/api/auth", None, Some(json!({ "email": "a@x.com", "password": "secret1" })))
        .await;

    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();
    assert_eq!(app.user_id(token), app.user_id(&registered));
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let app = TestApp::new();
    app.register("a@x.com", "secret1").await;

    let wrong_password = app
        .api("POST", "/api/auth", None, Some(json!({ "email": "a@x.com", "password": "wrong12" })))
        .await;
    let unknown_email = app
        .api("POST", "/api/auth", None, Some(json!({ "email": "z@x.com", "password": "secret1" })))
        .await;

    assert_eq!(wrong_password.0, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password.1, json!({ "errors": [{ "msg": "Invalid credentials" }] }));
}

#[tokio::test]
async fn login_requires_password() {
    let app = TestApp::new();
    let (status, body) = app.api("POST", "/api/auth", None, Some(json!({ "email": "a@x.com" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["msg"], "Password is required");
    assert_eq!(body["errors"][0]["param"], "password");
}

#[tokio::test]
async fn current_user_omits_password() {
    let app = TestApp::new();
    let token = app.register("a@x.com", "secret1").await;

    let (status, body) = app.api("GET", "/api/auth", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], app.user_id(&token));
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["avatar"], avatar_url("a@x.com"));
    assert!(body.get("date").is_some());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn missing_token_is_denied() {
    let app = TestApp::new();
    let (status, body) = app.api("GET", "/api/auth", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "No token, authorization denied");
}

#[tokio::test]
async fn garbage_token_is_not_valid() {
    let app = TestApp::new();
    let (status, body) = app.api("GET", "/api/auth", Some("not.a.jwt"), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "Token is not valid");
}

#[tokio::test]
async fn token_from_other_secret_is_not_valid() {
    let app = TestApp::new();
    let forged = TokenService::new("someone-else", 3600).unwrap().issue(Uuid::new_v4()).unwrap();

    let (status, body) = app.api("GET", "/api/tweets", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "Token is not valid");
}

#[tokio::test]
async fn expired_token_is_not_valid() {
    let app = TestApp::new();
    let token = app.register("a@x.com", "secret1").await;
    let id = app.state.tokens.verify(&token).unwrap().user.id;

    let mut claims = Claims::new(id, 60);
    claims.iat -= 7200;
    claims.exp -= 7200;
    let expired = app.state.tokens.sign(&claims).unwrap();

    let (status, body) = app.api("GET", "/api/auth", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "Token is not valid");
}

#[tokio::test]
async fn unknown_route_is_not_found_without_token() {
    let app = TestApp::new();
    let (status, _) = app.api("GET", "/api/nothing-here", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_store_backend() {
    let app = TestApp::new();
    let (status, body) = app.api("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}
