//! National ID and phone number validation
//!
//! Both validators are pure functions over string input: they either return
//! the canonical normalized value or a classified rejection. The HTTP layer
//! maps the classification to a response; nothing here performs I/O.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while validating user fields
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed value: {0}")]
    Malformed(String),

    #[error("national ID failed checksum verification")]
    ChecksumMismatch,

    #[error("phone number must start with the '05' prefix")]
    InvalidPrefix,
}

const MIN_NAME_LENGTH: usize = 2;
const MAX_NAME_LENGTH: usize = 100;
const MAX_ADDRESS_LENGTH: usize = 200;

/// National identity number - 9 ASCII digits with a valid check digit
///
/// Eight-digit input is accepted and canonicalized by left-padding a single
/// zero, so the stored form is always 9 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalId(String);

impl NationalId {
    /// Parse and validate a raw ID string
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        validate_id(raw.as_ref())
    }

    /// Get the canonical 9-digit form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NationalId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_id(&value)
    }
}

impl From<NationalId> for String {
    fn from(id: NationalId) -> Self {
        id.0
    }
}

impl std::fmt::Display for NationalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mobile phone number - 10 ASCII digits starting with "05"
///
/// Formatting characters (dashes, spaces, dots) are stripped before
/// validation, so `"050-123-4567"` and `"0501234567"` are the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse and validate a raw phone string
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        validate_phone(raw.as_ref())
    }

    /// Get the canonical 10-digit form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_phone(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate a national ID
///
/// Rules:
/// - After trimming, digits only, 8 or 9 characters
/// - 8-digit input is left-padded with one zero
/// - The weighted digit sum must be divisible by 10
pub fn validate_id(raw: &str) -> Result<NationalId, ValidationError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Malformed(
            "national ID cannot be empty".to_string(),
        ));
    }

    if let Some(c) = trimmed.chars().find(|c| !c.is_ascii_digit()) {
        return Err(ValidationError::Malformed(format!(
            "national ID contains non-digit character: '{}'",
            c
        )));
    }

    if trimmed.len() < 8 || trimmed.len() > 9 {
        return Err(ValidationError::Malformed(format!(
            "national ID must be 8 or 9 digits, got {}",
            trimmed.len()
        )));
    }

    let canonical = if trimmed.len() == 8 {
        format!("0{}", trimmed)
    } else {
        trimmed.to_string()
    };

    if !checksum_valid(&canonical) {
        return Err(ValidationError::ChecksumMismatch);
    }

    Ok(NationalId(canonical))
}

/// Weighted mod-10 check over the canonical 9-digit form
///
/// Digits at even 0-based positions weigh 1, odd positions weigh 2; a
/// two-digit product is reduced to its digit sum (p - 9). The ID is valid
/// iff the total is divisible by 10.
fn checksum_valid(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            let product = if i % 2 == 0 { d } else { d * 2 };
            if product >= 10 {
                product - 9
            } else {
                product
            }
        })
        .sum();

    sum % 10 == 0
}

/// Validate a mobile phone number
///
/// Rules:
/// - All non-digit characters are stripped first
/// - Exactly 10 digits remain
/// - The number starts with "05"
pub fn validate_phone(raw: &str) -> Result<PhoneNumber, ValidationError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != 10 {
        return Err(ValidationError::Malformed(format!(
            "phone number must be exactly 10 digits, got {}",
            digits.len()
        )));
    }

    if !digits.starts_with("05") {
        return Err(ValidationError::InvalidPrefix);
    }

    Ok(PhoneNumber(digits))
}

/// Validate a user's display name
///
/// Rules:
/// - Trimmed, non-empty
/// - Between 2 and 100 characters
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();

    if trimmed.len() < MIN_NAME_LENGTH {
        return Err(ValidationError::Malformed(format!(
            "name must be at least {} characters long",
            MIN_NAME_LENGTH
        )));
    }

    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::Malformed(format!(
            "name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        )));
    }

    Ok(trimmed.to_string())
}

/// Validate a user's address
///
/// Rules:
/// - Trimmed, non-empty
/// - At most 200 characters
pub fn validate_address(address: &str) -> Result<String, ValidationError> {
    let trimmed = address.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Malformed(
            "address cannot be empty".to_string(),
        ));
    }

    if trimmed.len() > MAX_ADDRESS_LENGTH {
        return Err(ValidationError::Malformed(format!(
            "address exceeds maximum length of {} characters",
            MAX_ADDRESS_LENGTH
        )));
    }

    Ok(trimmed.to_string())
}
