//! Client-side state: three slices driven by typed actions.
//!
//! A single task owns [`RootState`] and applies actions in the order they
//! were dispatched. Readers get snapshots through a `watch` channel, so no
//! state is shared mutably.

pub mod alert;
pub mod auth;
pub mod profile;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use uuid::Uuid;

use crate::database::models::{PopulatedProfile, PublicUser};

pub use alert::{Alert, AlertType};
pub use auth::AuthState;
pub use profile::{ProfileError, ProfileOwner, ProfileState, ProfileView};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetAlert(Alert),
    RemoveAlert(Uuid),

    AuthStart,
    RegisterSuccess { token: String },
    RegisterFail,
    UserLoaded(PublicUser),
    AuthError,
    LoginSuccess { token: String },
    LoginFail,
    Logout,
    AccountDeleted,

    ProfileStart,
    GetProfile(ProfileView),
    GetProfiles(Vec<PopulatedProfile>),
    ProfileError { msg: String, status: u16 },
    ClearProfile,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootState {
    pub alerts: Vec<Alert>,
    pub auth: AuthState,
    pub profile: ProfileState,
}

impl RootState {
    /// Every slice sees every action; slices ignore what they do not handle.
    pub fn reduce(&self, action: &Action) -> RootState {
        RootState {
            alerts: alert::reduce(&self.alerts, action),
            auth: auth::reduce(&self.auth, action),
            profile: profile::reduce(&self.profile, action),
        }
    }
}

enum Envelope {
    Action(Action),
    Flush(oneshot::Sender<()>),
}

/// Cloneable handle that queues actions for the store task.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Envelope>,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Envelope::Action(action) => f.debug_tuple("Action").field(action).finish(),
            Envelope::Flush(_) => f.write_str("Flush"),
        }
    }
}

impl Dispatcher {
    pub fn dispatch(&self, action: Action) {
        if self.tx.send(Envelope::Action(action)).is_err() {
            tracing::debug!("Store task stopped; action dropped");
        }
    }

    /// Resolves once every action queued before this call has been applied.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Envelope::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }
}

/// Owns the store task. Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct ClientStore {
    dispatcher: Dispatcher,
    state: watch::Receiver<RootState>,
}

impl ClientStore {
    pub fn new() -> Self {
        Self::with_state(RootState::default())
    }

    pub fn with_state(initial: RootState) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Envelope>();
        let (state_tx, state_rx) = watch::channel(initial.clone());

        tokio::spawn(async move {
            let mut state = initial;
            while let Some(envelope) = rx.recv().await {
                match envelope {
                    Envelope::Action(action) => {
                        state = state.reduce(&action);
                        state_tx.send_replace(state.clone());
                    }
                    Envelope::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
        });

        Self {
            dispatcher: Dispatcher { tx },
            state: state_rx,
        }
    }

    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    pub fn dispatch(&self, action: Action) {
        self.dispatcher.dispatch(action);
    }

    pub async fn flush(&self) {
        self.dispatcher.flush().await;
    }

    /// Latest applied state.
    pub fn state(&self) -> RootState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.state.clone()
    }
}

impl Default for ClientStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn actions_apply_in_dispatch_order() {
        let store = ClientStore::new();
        let alert = Alert {
            id: Uuid::new_v4(),
            msg: "hi".into(),
            alert_type: AlertType::Success,
        };

        store.dispatch(Action::LoginSuccess { token: "t".into() });
        store.dispatch(Action::SetAlert(alert.clone()));
        store.dispatch(Action::Logout);
        store.flush().await;

        let state = store.state();
        assert_eq!(state.alerts, vec![alert]);
        assert!(!state.auth.is_authenticated);
        assert!(state.auth.token.is_none());
    }

    #[tokio::test]
    async fn subscribers_see_updates() {
        let store = ClientStore::new();
        let mut rx = store.subscribe();

        store.dispatch(Action::ClearProfile);
        rx.changed().await.unwrap();
        assert!(!rx.borrow().profile.loading);
    }

    #[test]
    fn initial_state_is_loading_and_signed_out() {
        let state = RootState::default();
        assert!(state.alerts.is_empty());
        assert!(state.auth.loading);
        assert!(!state.auth.is_authenticated);
        assert!(state.profile.loading);
        assert!(state.profile.error.is_none());
    }
}
