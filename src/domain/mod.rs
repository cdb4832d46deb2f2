//! Domain layer - Core business logic and entities

pub mod account;
pub mod error;
pub mod user;

pub use account::{Account, AccountRepository};
pub use error::DomainError;
pub use user::{
    validate_address, validate_id, validate_name, validate_phone, NationalId, PhoneNumber, User,
    UserPage, UserQuery, UserRepository, ValidationError,
};
