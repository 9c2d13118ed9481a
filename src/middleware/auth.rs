use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{INVALID_TOKEN, NO_TOKEN};
use crate::error::ApiError;
use crate::server::AppState;

pub const TOKEN_HEADER: &str = "x-auth-token";

/// Caller identity taken from a verified token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Token middleware for protected routes: verifies `x-auth-token` and
/// injects [`AuthUser`] into the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&headers)?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        ApiError::unauthorized(INVALID_TOKEN)
    })?;

    request.extensions_mut().insert(AuthUser { id: claims.user.id });
    Ok(next.run(request).await)
}

fn extract_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(TOKEN_HEADER)
        .ok_or_else(|| ApiError::unauthorized(NO_TOKEN))?;

    let token = value
        .to_str()
        .map_err(|_| ApiError::unauthorized(INVALID_TOKEN))?
        .trim();

    if token.is_empty() {
        return Err(ApiError::unauthorized(NO_TOKEN));
    }
    Ok(token)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| ApiError::unauthorized(NO_TOKEN))
    }
}
