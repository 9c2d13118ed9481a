pub mod auth;
pub mod json;

pub use auth::{require_auth, AuthUser, TOKEN_HEADER};
pub use json::JsonBody;
