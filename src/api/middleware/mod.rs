//! API middleware components

pub mod account_auth;

pub use account_auth::{extract_bearer_token, OptionalAccount, RequireAccount};
