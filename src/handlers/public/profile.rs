// handlers/public/profile.rs - GET /api/profile, GET /api/profile/user/:id

use axum::{
    extract::{Path, State},
    Json,
};

use crate::database::models::PopulatedProfile;
use crate::error::{ApiError, ApiResult};
use crate::handlers::parse_id;
use crate::server::AppState;

pub const PROFILE_NOT_FOUND: &str = "Profile not found";

/// GET /api/profile - All profiles with owner avatar, in stored order
pub async fn list_profiles(State(state): State<AppState>) -> ApiResult<Json<Vec<PopulatedProfile>>> {
    Ok(Json(state.store.list_profiles().await?))
}

/// GET /api/profile/user/:id
///
/// A malformed id is reported as a missing profile (400).
pub async fn profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<PopulatedProfile>> {
    let user_id = parse_id(&user_id, || ApiError::bad_request(PROFILE_NOT_FOUND))?;

    state
        .store
        .find_populated_profile(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::bad_request(PROFILE_NOT_FOUND))
}
