use anyhow::anyhow;

use crate::cli::config::Session;
use crate::client::store::{Alert, AlertType, AuthState, ProfileError};
use crate::client::views::{guard, render_alerts, Access};
use crate::client::{Actions, ClientStore, RootState};
use crate::database::models::PublicUser;

pub const NOT_SIGNED_IN: &str = "Not signed in. Run `twit login <email>` first";

/// One invocation's client: a store seeded from the saved session and the
/// actions that drive it. Commands dispatch actions, then read the state.
pub struct Frontend {
    store: ClientStore,
    actions: Actions,
}

impl Frontend {
    pub fn new(session: &Session) -> Self {
        let store = ClientStore::with_state(RootState {
            auth: AuthState {
                token: session.token.clone(),
                ..AuthState::default()
            },
            ..RootState::default()
        });
        let actions = Actions::new(session.client(), store.dispatcher());
        Self { store, actions }
    }

    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    /// State after every dispatched action has been applied.
    pub async fn state(&self) -> RootState {
        self.store.flush().await;
        self.store.state()
    }

    /// Loads the signed-in user and applies the private-route guard.
    pub async fn require_user(&self) -> anyhow::Result<PublicUser> {
        self.actions.load_user().await;
        let state = self.state().await;

        match (guard(&state.auth), state.auth.user) {
            (Access::Granted, Some(user)) => Ok(user),
            _ => Err(anyhow!(NOT_SIGNED_IN)),
        }
    }
}

/// Danger alerts raised so far, or `fallback` when there are none.
pub fn alerts_error(state: &RootState, fallback: &str) -> anyhow::Error {
    let danger: Vec<Alert> = state
        .alerts
        .iter()
        .filter(|a| a.alert_type == AlertType::Danger)
        .cloned()
        .collect();

    if danger.is_empty() {
        anyhow!(fallback.to_string())
    } else {
        anyhow!(render_alerts(&danger))
    }
}

pub fn profile_error(error: Option<&ProfileError>) -> anyhow::Error {
    match error {
        Some(e) => anyhow!("{} ({})", e.msg, e.status),
        None => anyhow!("Profile not available"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn alert(msg: &str, alert_type: AlertType) -> Alert {
        Alert {
            id: Uuid::new_v4(),
            msg: msg.into(),
            alert_type,
        }
    }

    #[test]
    fn alerts_error_lists_only_danger_alerts() {
        let state = RootState {
            alerts: vec![
                alert("Profile created", AlertType::Success),
                alert("Name is required", AlertType::Danger),
            ],
            ..RootState::default()
        };

        assert_eq!(alerts_error(&state, "failed").to_string(), "✗ Name is required");
        assert_eq!(alerts_error(&RootState::default(), "failed").to_string(), "failed");
    }

    #[tokio::test]
    async fn signed_out_session_is_refused_without_a_request() {
        let session = Session {
            server_url: "http://127.0.0.1:9".into(),
            ..Session::default()
        };
        let frontend = Frontend::new(&session);

        let err = frontend.require_user().await.unwrap_err();
        assert_eq!(err.to_string(), NOT_SIGNED_IN);
        assert!(!frontend.state().await.auth.loading);
    }
}
