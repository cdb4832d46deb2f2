//! User domain
//!
//! This module provides the user record entity, the national ID and phone
//! number validators, and the repository trait for user storage.

mod entity;
mod repository;
mod validation;

pub use entity::User;
pub use repository::{UserPage, UserQuery, UserRepository};
pub use validation::{
    validate_address, validate_id, validate_name, validate_phone, NationalId, PhoneNumber,
    ValidationError,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
