//! Operator account domain
//!
//! Login identities for the optional JWT authentication layer.

mod entity;
mod repository;

pub use entity::Account;
pub use repository::AccountRepository;
