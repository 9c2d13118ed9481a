// handlers/protected/auth.rs - GET /api/auth handler

use axum::{extract::State, Json};

use super::load_caller;
use crate::database::models::PublicUser;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::server::AppState;

/// GET /api/auth - The authenticated account, password omitted
///
/// Expected Output:
/// ```json
/// { "_id": "…", "email": "ann@example.com", "avatar": "//www.gravatar.com/avatar/…", "date": "…" }
/// ```
pub async fn current_user(State(state): State<AppState>, caller: AuthUser) -> ApiResult<Json<PublicUser>> {
    let user = load_caller(&state, caller).await?;
    Ok(Json(user.public()))
}
