// handlers/public/auth.rs - POST /api/auth handler

use axum::{extract::State, Json};
use tracing::warn;

use super::users::TokenResponse;
use crate::error::{ApiError, ApiResult};
use crate::middleware::JsonBody;
use crate::server::AppState;
use crate::validation::LoginRequest;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// POST /api/auth - Exchange email and password for a token
///
/// Unknown email and wrong password answer identically.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate().map_err(ApiError::validation)?;
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let Some(user) = state.store.find_user_by_email(&email).await? else {
        warn!("Login failed: unknown email");
        return Err(ApiError::rejected(INVALID_CREDENTIALS));
    };

    if !state.passwords.verify(&password, &user.password).await? {
        warn!("Login failed: bad password for user {}", user.id);
        return Err(ApiError::rejected(INVALID_CREDENTIALS));
    }

    let token = state.tokens.issue(user.id)?;
    Ok(Json(TokenResponse { token }))
}
