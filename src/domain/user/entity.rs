//! User record entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{NationalId, PhoneNumber};

/// A registered person, keyed by national ID
///
/// The ID is immutable once the record exists; the remaining fields can be
/// updated and bump `updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// National identity number, canonical 9-digit form
    id: NationalId,
    /// Display name
    name: String,
    /// Mobile phone, canonical 10-digit form
    phone_number: PhoneNumber,
    /// Postal address
    address: String,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user record
    pub fn new(
        id: NationalId,
        name: impl Into<String>,
        phone_number: PhoneNumber,
        address: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            name: name.into(),
            phone_number,
            address: address.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a record from storage with its original timestamps
    pub fn from_parts(
        id: NationalId,
        name: impl Into<String>,
        phone_number: PhoneNumber,
        address: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            phone_number,
            address: address.into(),
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &NationalId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Update the display name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Update the phone number
    pub fn set_phone_number(&mut self, phone_number: PhoneNumber) {
        self.phone_number = phone_number;
        self.touch();
    }

    /// Update the address
    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{validate_id, validate_phone};

    fn create_test_user() -> User {
        User::new(
            validate_id("123456782").unwrap(),
            "John Doe",
            validate_phone("0501234567").unwrap(),
            "123 Main St, Tel Aviv",
        )
    }

    #[test]
    fn test_user_creation() {
        let user = create_test_user();

        assert_eq!(user.id().as_str(), "123456782");
        assert_eq!(user.name(), "John Doe");
        assert_eq!(user.phone_number().as_str(), "0501234567");
        assert_eq!(user.address(), "123 Main St, Tel Aviv");
        assert_eq!(user.created_at(), user.updated_at());
    }

    #[test]
    fn test_setters_bump_updated_at() {
        let mut user = create_test_user();
        let original_updated = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));

        user.set_name("Jane Doe");
        assert_eq!(user.name(), "Jane Doe");
        assert!(user.updated_at() > original_updated);
    }

    #[test]
    fn test_set_phone_number() {
        let mut user = create_test_user();

        user.set_phone_number(validate_phone("050-987-6543").unwrap());
        assert_eq!(user.phone_number().as_str(), "0509876543");
    }

    #[test]
    fn test_set_address() {
        let mut user = create_test_user();

        user.set_address("456 Oak Ave, Haifa");
        assert_eq!(user.address(), "456 Oak Ave, Haifa");
    }

    #[test]
    fn test_from_parts_preserves_timestamps() {
        let created = Utc::now() - chrono::Duration::days(2);
        let updated = Utc::now() - chrono::Duration::days(1);

        let user = User::from_parts(
            validate_id("123456782").unwrap(),
            "John Doe",
            validate_phone("0501234567").unwrap(),
            "123 Main St",
            created,
            updated,
        );

        assert_eq!(user.created_at(), created);
        assert_eq!(user.updated_at(), updated);
    }

    #[test]
    fn test_serialization_uses_canonical_forms() {
        let user = User::new(
            validate_id("12345674").unwrap(),
            "Jane Smith",
            validate_phone("050-987-6543").unwrap(),
            "456 Oak Ave, Haifa",
        );

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], "012345674");
        assert_eq!(json["phone_number"], "0509876543");
    }
}
