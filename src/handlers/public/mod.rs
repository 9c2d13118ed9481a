// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition (register, login) and read-only profile browsing.
// Middleware: none beyond the router-wide CORS and trace layers.

pub mod auth;
pub mod profile;
pub mod users;
