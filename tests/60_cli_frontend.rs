mod common;

use anyhow::Result;

use common::TestServer;
use twitter_clone::cli::config::Session;
use twitter_clone::cli::frontend::{alerts_error, Frontend, NOT_SIGNED_IN};
use twitter_clone::validation::ProfileRequest;

fn session(server: &TestServer, token: Option<String>) -> Session {
    Session {
        server_url: server.base_url.clone(),
        token,
        ..Session::default()
    }
}

async fn signed_in(server: &TestServer, email: &str) -> Session {
    let frontend = Frontend::new(&session(server, None));
    frontend.actions().register(email, "secret1").await;
    let token = frontend.state().await.auth.token;
    assert!(token.is_some(), "register {}", email);
    session(server, token)
}

#[tokio::test]
async fn saved_token_passes_the_guard() -> Result<()> {
    let server = TestServer::spawn().await?;
    let session = signed_in(&server, "a@x.com").await;

    let user = Frontend::new(&session).require_user().await?;
    assert_eq!(user.email, "a@x.com");
    Ok(())
}

#[tokio::test]
async fn stale_token_is_sent_to_sign_in() -> Result<()> {
    let server = TestServer::spawn().await?;
    let session = session(&server, Some("not.a.jwt".to_string()));

    let frontend = Frontend::new(&session);
    let err = frontend.require_user().await.unwrap_err();
    assert_eq!(err.to_string(), NOT_SIGNED_IN);
    assert!(frontend.state().await.auth.token.is_none());
    Ok(())
}

#[tokio::test]
async fn failed_login_surfaces_alerts() -> Result<()> {
    let server = TestServer::spawn().await?;
    signed_in(&server, "a@x.com").await;

    let frontend = Frontend::new(&session(&server, None));
    frontend.actions().login("a@x.com", "wrong12").await;
    let state = frontend.state().await;

    assert!(!state.auth.is_authenticated);
    assert_eq!(alerts_error(&state, "Login failed").to_string(), "✗ Invalid credentials");
    Ok(())
}

#[tokio::test]
async fn profile_set_then_me() -> Result<()> {
    let server = TestServer::spawn().await?;
    let session = signed_in(&server, "a@x.com").await;

    let frontend = Frontend::new(&session);
    frontend.require_user().await?;
    let form = ProfileRequest {
        name: Some("Ann".to_string()),
        ..Default::default()
    };
    assert!(frontend.actions().create_profile(&form, false).await);

    let frontend = Frontend::new(&session);
    frontend.actions().get_current_profile().await;
    let state = frontend.state().await;
    assert_eq!(state.profile.profile.map(|p| p.name), Some("Ann".to_string()));
    Ok(())
}
