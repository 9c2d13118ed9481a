mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::TestApp;
use twitter_clone::auth::avatar_url;

#[tokio::test]
async fn own_profile_missing_is_bad_request() {
    let app = TestApp::new();
    let token = app.register("a@x.com", "secret1").await;

    let (status, body) = app.api("GET", "/api/profile/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "There is no profile for this user");
}

#[tokio::test]
async fn profile_requires_name() {
    let app = TestApp::new();
    let token = app.register("a@x.com", "secret1").await;

    let (status, body) = app
        .api("POST", "/api/profile", Some(&token), Some(json!({ "name": "  ", "bio": "hi" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["msg"], "Name is required");
    assert_eq!(body["errors"][0]["param"], "name");
}

#[tokio::test]
async fn upsert_creates_then_fully_replaces() {
    let app = TestApp::new();
    let token = app.register("a@x.com", "secret1").await;
    let user_id = app.user_id(&token);

    let (status, created) = app
        .api(
            "POST",
            "/api/profile",
            Some(&token),
            Some(json!({ "name": "A", "bio": "first", "youtube": "yt/a" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["user"], user_id);
    assert_eq!(created["bio"], "first");
    assert_eq!(created["social"]["youtube"], "yt/a");

    let (status, updated) = app
        .api("POST", "/api/profile", Some(&token), Some(json!({ "name": "A2", "location": "Leeds" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["_id"], created["_id"]);
    assert_eq!(updated["date"], created["date"]);
    assert_eq!(updated["name"], "A2");
    assert_eq!(updated["location"], "Leeds");
    assert!(updated.get("bio").is_none());
    assert!(updated["social"].get("youtube").is_none());

    let (_, profiles) = app.api("GET", "/api/profile", None, None).await;
    assert_eq!(profiles.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn own_profile_is_populated_with_owner() {
    let app = TestApp::new();
    let token = app.register("a@x.com", "secret1").await;
    app.create_profile(&token, "A").await;

    let (status, body) = app.api("GET", "/api/profile/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "A");
    assert_eq!(body["user"]["_id"], app.user_id(&token));
    assert_eq!(body["user"]["avatar"], avatar_url("a@x.com"));
    assert!(body["user"].get("email").is_none());
}

#[tokio::test]
async fn profiles_are_public_and_in_stored_order() {
    let app = TestApp::new();
    let a = app.register("a@x.com", "secret1").await;
    let b = app.register("b@x.com", "secret1").await;
    app.create_profile(&a, "A").await;
    app.create_profile(&b, "B").await;

    let (status, body) = app.api("GET", "/api/profile", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(body[1]["user"]["_id"], app.user_id(&b));
}

#[tokio::test]
async fn profile_by_user_id() {
    let app = TestApp::new();
    let token = app.register("a@x.com", "secret1").await;
    app.create_profile(&token, "A").await;

    let uri = format!("/api/profile/user/{}", app.user_id(&token));
    let (status, body) = app.api("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "A");

    let uri = format!("/api/profile/user/{}", Uuid::new_v4());
    let (status, body) = app.api("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Profile not found");

    let (status, body) = app.api("GET", "/api/profile/user/not-an-id", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Profile not found");
}

#[tokio::test]
async fn concurrent_upserts_leave_one_profile() {
    let app = TestApp::new();
    let token = app.register("a@x.com", "secret1").await;

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let app = app.clone();
            let token = token.clone();
            tokio::spawn(async move {
                app.api("POST", "/api/profile", Some(&token), Some(json!({ "name": format!("A{}", i) })))
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().0, StatusCode::OK);
    }

    let (_, profiles) = app.api("GET", "/api/profile", None, None).await;
    assert_eq!(profiles.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_user_leaves_zero_profiles() {
    let app = TestApp::new();
    let token = app.register("a@x.com", "secret1").await;
    app.create_profile(&token, "A").await;

    app.api("DELETE", "/api/users", Some(&token), None).await;

    let (_, profiles) = app.api("GET", "/api/profile", None, None).await;
    assert_eq!(profiles, json!([]));

    let other = app.register("b@x.com", "secret1").await;
    let (status, _) = app.api("GET", "/api/profile/me", Some(&other), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
