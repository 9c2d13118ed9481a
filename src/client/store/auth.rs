use serde::{Deserialize, Serialize};

use super::Action;
use crate::database::models::PublicUser;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub user: Option<PublicUser>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            token: None,
            is_authenticated: false,
            loading: true,
            user: None,
        }
    }
}

impl AuthState {
    fn signed_out() -> Self {
        Self {
            loading: false,
            ..Self::default()
        }
    }
}

pub fn reduce(state: &AuthState, action: &Action) -> AuthState {
    match action {
        Action::AuthStart => AuthState {
            loading: true,
            ..state.clone()
        },
        Action::RegisterSuccess { token } | Action::LoginSuccess { token } => AuthState {
            token: Some(token.clone()),
            is_authenticated: true,
            loading: false,
            ..state.clone()
        },
        Action::UserLoaded(user) => AuthState {
            is_authenticated: true,
            loading: false,
            user: Some(user.clone()),
            ..state.clone()
        },
        Action::RegisterFail
        | Action::LoginFail
        | Action::AuthError
        | Action::Logout
        | Action::AccountDeleted => AuthState::signed_out(),
        _ => state.clone(),
    }
}
