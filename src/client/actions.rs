use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::api::{ApiClient, ClientError};
use super::store::{Action, Alert, AlertType, Dispatcher, ProfileView};
use crate::validation::ProfileRequest;

/// Default lifetime of an alert.
pub const ALERT_TIMEOUT: Duration = Duration::from_millis(5000);

pub const PROFILE_CREATED: &str = "Profile created";
pub const PROFILE_UPDATED: &str = "Profile updated";
pub const ACCOUNT_DELETED: &str = "Your account has been permanently deleted";

/// Async action creators: each performs one API call and dispatches the
/// matching start/success/error actions.
pub struct Actions {
    api: RwLock<ApiClient>,
    dispatcher: Dispatcher,
    alert_timeout: Duration,
}

impl Actions {
    pub fn new(api: ApiClient, dispatcher: Dispatcher) -> Self {
        Self {
            api: RwLock::new(api),
            dispatcher,
            alert_timeout: ALERT_TIMEOUT,
        }
    }

    pub fn with_alert_timeout(mut self, timeout: Duration) -> Self {
        self.alert_timeout = timeout;
        self
    }

    async fn api(&self) -> ApiClient {
        self.api.read().await.clone()
    }

    async fn set_token(&self, token: Option<String>) {
        self.api.write().await.set_token(token);
    }

    /// Raises an alert that removes itself after `timeout`. The removal is
    /// not cancellable; removing an alert that is already gone is a no-op.
    pub fn set_alert(&self, msg: impl Into<String>, alert_type: AlertType, timeout: Option<Duration>) -> Uuid {
        let id = Uuid::new_v4();
        self.dispatcher.dispatch(Action::SetAlert(Alert {
            id,
            msg: msg.into(),
            alert_type,
        }));

        let dispatcher = self.dispatcher.clone();
        let timeout = timeout.unwrap_or(self.alert_timeout);
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            dispatcher.dispatch(Action::RemoveAlert(id));
        });

        id
    }

    fn alert_errors(&self, err: &ClientError) {
        for msg in err.messages() {
            self.set_alert(msg, AlertType::Danger, None);
        }
    }

    fn profile_error(&self, err: &ClientError) {
        let (msg, status) = err.status();
        self.dispatcher.dispatch(Action::ProfileError { msg, status });
    }

    pub async fn register(&self, email: &str, password: &str) {
        self.dispatcher.dispatch(Action::AuthStart);

        match self.api().await.register(email, password).await {
            Ok(res) => {
                self.set_token(Some(res.token.clone())).await;
                self.dispatcher.dispatch(Action::RegisterSuccess { token: res.token });
                self.load_user().await;
            }
            Err(err) => {
                debug!("Register failed: {}", err);
                self.alert_errors(&err);
                self.set_token(None).await;
                self.dispatcher.dispatch(Action::RegisterFail);
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) {
        self.dispatcher.dispatch(Action::AuthStart);

        match self.api().await.login(email, password).await {
            Ok(res) => {
                self.set_token(Some(res.token.clone())).await;
                self.dispatcher.dispatch(Action::LoginSuccess { token: res.token });
                self.load_user().await;
            }
            Err(err) => {
                debug!("Login failed: {}", err);
                self.alert_errors(&err);
                self.set_token(None).await;
                self.dispatcher.dispatch(Action::LoginFail);
            }
        }
    }

    pub async fn load_user(&self) {
        let api = self.api().await;
        if api.token().is_none() {
            self.dispatcher.dispatch(Action::AuthError);
            return;
        }

        match api.current_user().await {
            Ok(user) => self.dispatcher.dispatch(Action::UserLoaded(user)),
            Err(err) => {
                debug!("Loading user failed: {}", err);
                self.set_token(None).await;
                self.dispatcher.dispatch(Action::AuthError);
            }
        }
    }

    pub async fn logout(&self) {
        self.set_token(None).await;
        self.dispatcher.dispatch(Action::ClearProfile);
        self.dispatcher.dispatch(Action::Logout);
    }

    pub async fn get_current_profile(&self) {
        self.dispatcher.dispatch(Action::ProfileStart);

        match self.api().await.own_profile().await {
            Ok(profile) => self.dispatcher.dispatch(Action::GetProfile(profile.into())),
            Err(err) => {
                self.dispatcher.dispatch(Action::ClearProfile);
                self.profile_error(&err);
            }
        }
    }

    pub async fn get_profiles(&self) {
        self.dispatcher.dispatch(Action::ClearProfile);
        self.dispatcher.dispatch(Action::ProfileStart);

        match self.api().await.profiles().await {
            Ok(profiles) => self.dispatcher.dispatch(Action::GetProfiles(profiles)),
            Err(err) => self.profile_error(&err),
        }
    }

    pub async fn get_profile_by_id(&self, user_id: &str) {
        self.dispatcher.dispatch(Action::ProfileStart);

        match self.api().await.profile_by_user(user_id).await {
            Ok(profile) => self.dispatcher.dispatch(Action::GetProfile(profile.into())),
            Err(err) => self.profile_error(&err),
        }
    }

    /// Saves the caller's profile. Returns whether the save succeeded so a
    /// view can move on.
    pub async fn create_profile(&self, form: &ProfileRequest, edit: bool) -> bool {
        self.dispatcher.dispatch(Action::ProfileStart);

        match self.api().await.upsert_profile(form).await {
            Ok(profile) => {
                self.dispatcher.dispatch(Action::GetProfile(ProfileView::from(profile)));
                let msg = if edit { PROFILE_UPDATED } else { PROFILE_CREATED };
                self.set_alert(msg, AlertType::Success, None);
                true
            }
            Err(err) => {
                self.alert_errors(&err);
                self.profile_error(&err);
                false
            }
        }
    }

    pub async fn delete_account(&self) {
        match self.api().await.delete_account().await {
            Ok(_) => {
                self.set_token(None).await;
                self.dispatcher.dispatch(Action::ClearProfile);
                self.dispatcher.dispatch(Action::AccountDeleted);
                self.set_alert(ACCOUNT_DELETED, AlertType::Info, None);
            }
            Err(err) => self.profile_error(&err),
        }
    }
}
