// handlers/protected/users.rs - DELETE /api/users handler

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use super::load_caller;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::server::AppState;

/// DELETE /api/users - Remove the caller's profile, then the account
///
/// Tweets are left in place. A second call fails with 401 because the
/// token no longer resolves to an account.
pub async fn delete_account(State(state): State<AppState>, caller: AuthUser) -> ApiResult<Json<Value>> {
    let user = load_caller(&state, caller).await?;

    state.store.delete_profile(user.id).await?;
    state.store.delete_user(user.id).await?;

    info!("Deleted user {}", user.id);
    Ok(Json(json!({ "msg": "User deleted" })))
}
