// handlers/mod.rs - Two-tier handler layout
//
// Public (no token) → Protected (x-auth-token verified by middleware).
// Several paths are shared between tiers (`/api/users`, `/api/auth`,
// `/api/profile`); the router merges their method routers.
pub mod public;
pub mod protected;

use uuid::Uuid;

use crate::error::ApiError;

/// Path ids that do not parse are reported like missing documents.
pub(crate) fn parse_id(raw: &str, missing: impl FnOnce() -> ApiError) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| missing())
}
