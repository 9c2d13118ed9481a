// handlers/protected/profile.rs - GET /api/profile/me, POST /api/profile

use axum::{extract::State, Json};

use super::load_caller;
use crate::database::models::{PopulatedProfile, Profile};
use crate::error::{ApiError, ApiResult};
use crate::middleware::{AuthUser, JsonBody};
use crate::server::AppState;
use crate::validation::ProfileRequest;

pub const NO_PROFILE: &str = "There is no profile for this user";

/// GET /api/profile/me - Caller's profile with owner avatar
pub async fn own_profile(State(state): State<AppState>, caller: AuthUser) -> ApiResult<Json<PopulatedProfile>> {
    state
        .store
        .find_populated_profile(caller.id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::bad_request(NO_PROFILE))
}

/// POST /api/profile - Create or fully replace the caller's profile
///
/// Expected Input:
/// ```json
/// { "name": "Ann", "bio": "…", "location": "…", "website": "…",
///   "youtube": "…", "facebook": "…", "linkedin": "…", "instagram": "…" }
/// ```
///
/// Fields left out of the body are cleared on update. Returns the stored
/// profile with the bare user id.
pub async fn upsert_profile(
    State(state): State<AppState>,
    caller: AuthUser,
    JsonBody(req): JsonBody<ProfileRequest>,
) -> ApiResult<Json<Profile>> {
    req.validate().map_err(ApiError::validation)?;
    let user = load_caller(&state, caller).await?;

    let profile = state.store.upsert_profile(user.id, req.into_fields()).await?;
    Ok(Json(profile))
}
