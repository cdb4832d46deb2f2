//! Operator authentication middleware using JWT tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::account::Account;

/// Extractor that requires a valid JWT token
///
/// Extracts the token from the `Authorization: Bearer <jwt>` header.
#[derive(Debug, Clone)]
pub struct RequireAccount(pub Account);

impl FromRequestParts<AppState> for RequireAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        debug!("Validating JWT token");

        let claims = state
            .jwt_service
            .validate(&token)
            .map_err(|e| ApiError::unauthorized(e.to_string()))?;

        let account = state
            .account_service
            .get(claims.username())
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?
            .ok_or_else(|| ApiError::unauthorized("Account not found"))?;

        Ok(RequireAccount(account))
    }
}

/// Extractor that accepts requests with or without a valid token
///
/// User CRUD routes work anonymously; when a valid token is present the
/// acting operator is recorded in the request logs. Invalid or expired
/// tokens degrade to anonymous rather than rejecting.
#[derive(Debug, Clone)]
pub struct OptionalAccount(pub Option<Account>);

impl OptionalAccount {
    /// Username to attribute the request to in logs
    pub fn actor(&self) -> &str {
        self.0.as_ref().map_or("anonymous", |a| a.username())
    }
}

impl FromRequestParts<AppState> for OptionalAccount {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let account = try_account_auth(&parts.headers, state).await;
        Ok(OptionalAccount(account))
    }
}

/// Extract a Bearer token from the Authorization header
pub fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(ApiError::unauthorized(
        "Authentication required. Provide a JWT via 'Authorization: Bearer <token>' header",
    ))
}

/// Try to resolve the account behind a token, returning None if absent or invalid
async fn try_account_auth(headers: &axum::http::HeaderMap, state: &AppState) -> Option<Account> {
    let token = extract_bearer_token(headers).ok()?;

    let claims = state.jwt_service.validate(&token).ok()?;

    state
        .account_service
        .get(claims.username())
        .await
        .ok()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::test_support::test_state_with_account;
    use axum::http::{HeaderMap, StatusCode};

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer eyJhbGciOiJIUzI1NiJ9.test".parse().unwrap(),
        );

        let result = extract_bearer_token(&headers);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "eyJhbGciOiJIUzI1NiJ9.test");
    }

    #[test]
    fn test_missing_token() {
        let headers = HeaderMap::new();

        let result = extract_bearer_token(&headers);
        assert!(result.is_err());

        let err = result.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_auth_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Basic dXNlcjpwYXNz".parse().unwrap(),
        );

        let result = extract_bearer_token(&headers);
        assert!(result.is_err());
    }

    #[test]
    fn test_trimmed_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer   token-with-spaces   ".parse().unwrap(),
        );

        let result = extract_bearer_token(&headers);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "token-with-spaces");
    }

    #[tokio::test]
    async fn test_try_account_auth_with_valid_token() {
        let state = test_state_with_account("admin", "secure_password").await;
        let account = state.account_service.get("admin").await.unwrap().unwrap();
        let token = state.jwt_service.generate(&account).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );

        let resolved = try_account_auth(&headers, &state).await;
        assert!(resolved.is_some());
        assert_eq!(resolved.unwrap().username(), "admin");
    }

    #[tokio::test]
    async fn test_try_account_auth_with_garbage_token() {
        let state = test_state_with_account("admin", "secure_password").await;

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer garbage".parse().unwrap());

        let resolved = try_account_auth(&headers, &state).await;
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_optional_account_actor() {
        let anonymous = OptionalAccount(None);
        assert_eq!(anonymous.actor(), "anonymous");

        let named = OptionalAccount(Some(crate::domain::account::Account::new("admin", "hash")));
        assert_eq!(named.actor(), "admin");
    }
}
