// handlers/public/users.rs - POST /api/users handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::avatar_url;
use crate::database::models::NewUser;
use crate::database::DatabaseError;
use crate::error::{ApiError, ApiResult};
use crate::middleware::JsonBody;
use crate::server::AppState;
use crate::validation::RegisterRequest;

pub const USER_EXISTS: &str = "User already exists";

/// Issued token, the body of every successful register/login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/users - Register a user and receive a token
///
/// Expected Input:
/// ```json
/// { "email": "ann@example.com", "password": "secret1" }
/// ```
///
/// Expected Output:
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiI..." }
/// ```
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate().map_err(ApiError::validation)?;
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::rejected(USER_EXISTS));
    }

    let hash = state.passwords.hash(&password).await?;
    let new_user = NewUser {
        avatar: avatar_url(&email),
        email,
        password: hash,
    };

    // The unique constraint settles registrations racing past the lookup
    let user = match state.store.insert_user(new_user).await {
        Ok(user) => user,
        Err(DatabaseError::Conflict(_)) => return Err(ApiError::rejected(USER_EXISTS)),
        Err(e) => return Err(e.into()),
    };

    info!("Registered user {}", user.id);
    let token = state.tokens.issue(user.id)?;
    Ok(Json(TokenResponse { token }))
}
