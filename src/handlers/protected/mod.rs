// handlers/protected/mod.rs - Protected handlers (token required)
//
// Every route here sits behind `middleware::require_auth`; handlers take
// the caller from the `AuthUser` extractor.

pub mod auth;
pub mod profile;
pub mod tweets;
pub mod users;

use crate::auth::INVALID_TOKEN;
use crate::database::models::User;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::server::AppState;

/// Loads the account behind a verified token. A token that outlived its
/// account is treated as invalid.
pub(crate) async fn load_caller(state: &AppState, caller: AuthUser) -> ApiResult<User> {
    state.store.find_user(caller.id).await?.ok_or_else(|| {
        tracing::warn!("Token subject {} no longer exists", caller.id);
        ApiError::unauthorized(INVALID_TOKEN)
    })
}
