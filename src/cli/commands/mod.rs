pub mod account;
pub mod auth;
pub mod profile;
pub mod tweet;
