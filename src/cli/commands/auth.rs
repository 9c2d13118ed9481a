use serde_json::json;

use crate::cli::config::{save_session, Session};
use crate::cli::frontend::{alerts_error, Frontend};
use crate::cli::utils::{output_document, output_success, resolve_password};
use crate::cli::OutputFormat;
use crate::client::RootState;

/// Copies the token the store ended up with into the saved session.
fn remember(session: &mut Session, email: String, state: &RootState) -> anyhow::Result<bool> {
    match (&state.auth.token, state.auth.is_authenticated) {
        (Some(token), true) => {
            session.sign_in(email, token.clone());
            save_session(session)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

pub async fn register(
    session: &mut Session,
    email: String,
    password: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let password = resolve_password(password)?;
    let frontend = Frontend::new(session);
    frontend.actions().register(&email, &password).await;

    let state = frontend.state().await;
    if !remember(session, email.clone(), &state)? {
        return Err(alerts_error(&state, "Registration failed"));
    }

    output_success(
        output_format,
        &format!("Registered {}", email),
        Some(json!({ "email": email, "server": session.server_url })),
    )
}

pub async fn login(
    session: &mut Session,
    email: String,
    password: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let password = resolve_password(password)?;
    let frontend = Frontend::new(session);
    frontend.actions().login(&email, &password).await;

    let state = frontend.state().await;
    if !remember(session, email.clone(), &state)? {
        return Err(alerts_error(&state, "Login failed"));
    }

    output_success(
        output_format,
        &format!("Signed in as {}", email),
        Some(json!({ "email": email, "server": session.server_url })),
    )
}

pub async fn logout(session: &mut Session, output_format: OutputFormat) -> anyhow::Result<()> {
    Frontend::new(session).actions().logout().await;
    session.sign_out();
    save_session(session)?;
    output_success(output_format, "Signed out", None)
}

pub async fn whoami(session: &Session, output_format: OutputFormat) -> anyhow::Result<()> {
    let user = Frontend::new(session).require_user().await?;

    let text = format!("{} ({})\nMember since {}", user.email, user.id, user.date.format("%Y-%m-%d"));
    output_document(output_format, &user, text)
}
