//! Client-side error taxonomy
//!
//! Mirrors the server's status mapping so callers can match on the failure
//! class instead of inspecting status codes.

use thiserror::Error;

use crate::domain::user::ValidationError;

/// Errors returned by [`UserApiClient`](super::UserApiClient)
#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected input - locally (fail-fast) or by the server with a 422
    #[error("validation failed{}: {message}", param_suffix(.param))]
    Validation {
        message: String,
        param: Option<String>,
    },

    /// 401 from the server
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// 404 from the server
    #[error("not found: {0}")]
    NotFound(String),

    /// 409 from the server
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other non-success response
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Network-level failure after retries were exhausted
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

fn param_suffix(param: &Option<String>) -> String {
    match param {
        Some(p) => format!(" for '{}'", p),
        None => String::new(),
    }
}

impl ClientError {
    /// Wrap a local validation failure, naming the offending field
    pub fn invalid_field(param: impl Into<String>, error: ValidationError) -> Self {
        Self::Validation {
            message: error.to_string(),
            param: Some(param.into()),
        }
    }

    /// Build the error matching a server response status
    pub fn from_status(status: u16, message: String, param: Option<String>) -> Self {
        match status {
            401 => Self::Authentication(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            400 | 422 => Self::Validation { message, param },
            _ => Self::Api { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ClientError::from_status(401, "no".into(), None),
            ClientError::Authentication(_)
        ));
        assert!(matches!(
            ClientError::from_status(404, "gone".into(), None),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            ClientError::from_status(409, "dup".into(), None),
            ClientError::Conflict(_)
        ));
        assert!(matches!(
            ClientError::from_status(422, "bad".into(), None),
            ClientError::Validation { .. }
        ));
        assert!(matches!(
            ClientError::from_status(500, "boom".into(), None),
            ClientError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_invalid_field_display() {
        let err = ClientError::invalid_field("id", ValidationError::ChecksumMismatch);
        let text = err.to_string();
        assert!(text.contains("'id'"));
        assert!(text.contains("checksum"));
    }
}
