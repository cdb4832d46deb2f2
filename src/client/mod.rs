//! HTTP client for the user registry API
//!
//! A companion library for test automation and service integration. The
//! client validates IDs and phone numbers locally before sending, so a
//! request that could only fail server-side validation never leaves the
//! process.

mod error;

pub use error::ClientError;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::types::ApiErrorResponse;
use crate::api::users::{UserListResponse, UserResponse};
use crate::domain::user::{validate_id, validate_phone};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// New user payload
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub address: String,
}

/// Partial update payload; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Health payload returned by the server
#[derive(Debug, Clone, Deserialize)]
pub struct HealthInfo {
    pub status: String,
    pub version: String,
}

/// Token payload returned by login
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: String,
}

/// Outcome of a bulk operation
#[derive(Debug)]
pub struct BulkOutcome<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<BulkFailure>,
}

impl<T> Default for BulkOutcome<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// A single failed item within a bulk operation
#[derive(Debug)]
pub struct BulkFailure {
    pub id: String,
    pub error: String,
}

impl<T> BulkOutcome<T> {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Client for the user registry API
///
/// Retries transport errors, 5xx responses, and 429 with exponential
/// backoff; other 4xx responses are returned immediately.
#[derive(Debug, Clone)]
pub struct UserApiClient {
    base_url: String,
    http: reqwest::Client,
    token: Option<String>,
    max_retries: u32,
    retry_delay: Duration,
}

impl UserApiClient {
    /// Create a client for the given base URL with default settings
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            token: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        self
    }

    /// Configure the retry policy
    pub fn with_retry_policy(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Set a Bearer token for subsequent requests
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Clear the stored Bearer token
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method, url);

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        builder
    }

    /// Send with retry; retries transport errors, 5xx, and 429
    async fn send_with_retry(
        &self,
        build: impl Fn() -> RequestBuilder,
    ) -> Result<Response, ClientError> {
        let mut attempt = 0;

        loop {
            let result = build().send().await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    let retryable = status.is_server_error()
                        || status == StatusCode::TOO_MANY_REQUESTS;

                    if !retryable || attempt >= self.max_retries {
                        return Ok(response);
                    }

                    warn!(
                        status = status.as_u16(),
                        attempt = attempt + 1,
                        "Retryable response, backing off"
                    );
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(ClientError::Transport(e));
                    }

                    warn!(error = %e, attempt = attempt + 1, "Transport error, backing off");
                }
            }

            let backoff = self.retry_delay * 2u32.pow(attempt);
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }

    /// Turn a non-success response into the matching ClientError
    async fn error_for(response: Response) -> ClientError {
        let status = response.status().as_u16();

        match response.json::<ApiErrorResponse>().await {
            Ok(body) => ClientError::from_status(status, body.error.message, body.error.param),
            Err(_) => ClientError::from_status(status, format!("HTTP {}", status), None),
        }
    }

    async fn expect_success(response: Response) -> Result<Response, ClientError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::error_for(response).await)
        }
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Check server health
    pub async fn health(&self) -> Result<HealthInfo, ClientError> {
        let response = self
            .send_with_retry(|| self.request(Method::GET, "/health"))
            .await?;
        let response = Self::expect_success(response).await?;

        Ok(response.json().await?)
    }

    /// Poll the server until it reports healthy or the deadline passes
    pub async fn wait_until_ready(
        &self,
        max_wait: Duration,
        check_interval: Duration,
    ) -> bool {
        let deadline = tokio::time::Instant::now() + max_wait;

        loop {
            if self.health().await.is_ok() {
                return true;
            }

            if tokio::time::Instant::now() >= deadline {
                return false;
            }

            debug!("Server not ready, polling again");
            tokio::time::sleep(check_interval).await;
        }
    }

    /// Authenticate and store the returned token for later requests
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<TokenInfo, ClientError> {
        let body = serde_json::json!({"username": username, "password": password});

        let response = self
            .send_with_retry(|| self.request(Method::POST, "/auth/login").json(&body))
            .await?;
        let response = Self::expect_success(response).await?;

        let token: TokenInfo = response.json().await?;
        self.set_token(&token.access_token);

        Ok(token)
    }

    /// Create a user record
    ///
    /// Validates the ID and phone number locally first; a malformed field
    /// fails without a network round trip.
    pub async fn create_user(&self, user: &NewUser) -> Result<UserResponse, ClientError> {
        validate_id(&user.id).map_err(|e| ClientError::invalid_field("id", e))?;
        validate_phone(&user.phone_number)
            .map_err(|e| ClientError::invalid_field("phone_number", e))?;

        let response = self
            .send_with_retry(|| self.request(Method::POST, "/users").json(user))
            .await?;
        let response = Self::expect_success(response).await?;

        Ok(response.json().await?)
    }

    /// Fetch a user by ID
    pub async fn get_user(&self, id: &str) -> Result<UserResponse, ClientError> {
        let response = self
            .send_with_retry(|| self.request(Method::GET, &format!("/users/{}", id)))
            .await?;
        let response = Self::expect_success(response).await?;

        Ok(response.json().await?)
    }

    /// List all user IDs
    pub async fn list_users(&self) -> Result<Vec<String>, ClientError> {
        let response = self
            .send_with_retry(|| self.request(Method::GET, "/users"))
            .await?;
        let response = Self::expect_success(response).await?;

        Ok(response.json().await?)
    }

    /// List users with details, pagination, and optional search
    pub async fn list_users_detailed(
        &self,
        page: usize,
        per_page: usize,
        search: Option<&str>,
    ) -> Result<UserListResponse, ClientError> {
        let response = self
            .send_with_retry(|| {
                let mut query: Vec<(&str, String)> = vec![
                    ("page", page.to_string()),
                    ("per_page", per_page.to_string()),
                ];
                if let Some(term) = search {
                    query.push(("search", term.to_string()));
                }

                self.request(Method::GET, "/users-detailed").query(&query)
            })
            .await?;
        let response = Self::expect_success(response).await?;

        Ok(response.json().await?)
    }

    /// Partially update a user
    pub async fn update_user(
        &self,
        id: &str,
        update: &UserUpdate,
    ) -> Result<UserResponse, ClientError> {
        if update.name.is_none() && update.phone_number.is_none() && update.address.is_none() {
            return Err(ClientError::Validation {
                message: "at least one field must be provided for update".to_string(),
                param: None,
            });
        }

        if let Some(phone) = &update.phone_number {
            validate_phone(phone).map_err(|e| ClientError::invalid_field("phone_number", e))?;
        }

        let response = self
            .send_with_retry(|| {
                self.request(Method::PUT, &format!("/users/{}", id)).json(update)
            })
            .await?;
        let response = Self::expect_success(response).await?;

        Ok(response.json().await?)
    }

    /// Delete a user
    pub async fn delete_user(&self, id: &str) -> Result<(), ClientError> {
        let response = self
            .send_with_retry(|| self.request(Method::DELETE, &format!("/users/{}", id)))
            .await?;
        Self::expect_success(response).await?;

        Ok(())
    }

    /// Create many users, collecting per-item outcomes
    pub async fn create_many(&self, users: &[NewUser]) -> BulkOutcome<UserResponse> {
        let mut outcome = BulkOutcome::default();

        for user in users {
            match self.create_user(user).await {
                Ok(created) => outcome.succeeded.push(created),
                Err(e) => outcome.failed.push(BulkFailure {
                    id: user.id.clone(),
                    error: e.to_string(),
                }),
            }
        }

        outcome
    }

    /// Delete many users, collecting per-item outcomes
    pub async fn delete_many(&self, ids: &[String]) -> BulkOutcome<String> {
        let mut outcome = BulkOutcome::default();

        for id in ids {
            match self.delete_user(id).await {
                Ok(()) => outcome.succeeded.push(id.clone()),
                Err(e) => outcome.failed.push(BulkFailure {
                    id: id.clone(),
                    error: e.to_string(),
                }),
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_user() -> NewUser {
        NewUser {
            id: "123456782".to_string(),
            name: "John Doe".to_string(),
            phone_number: "0501234567".to_string(),
            address: "123 Main St, Tel Aviv".to_string(),
        }
    }

    fn user_response_body(id: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": "John Doe",
            "phone_number": "0501234567",
            "address": "123 Main St, Tel Aviv",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    fn fast_client(server: &MockServer) -> UserApiClient {
        UserApiClient::new(server.uri())
            .with_retry_policy(2, Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "healthy",
                "version": "0.1.0"
            })))
            .mount(&server)
            .await;

        let client = fast_client(&server);
        let health = client.health().await.unwrap();

        assert_eq!(health.status, "healthy");
    }

    #[tokio::test]
    async fn test_create_user() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/users"))
            .and(body_partial_json(serde_json::json!({"id": "123456782"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(user_response_body("123456782")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = fast_client(&server);
        let created = client.create_user(&sample_user()).await.unwrap();

        assert_eq!(created.id, "123456782");
    }

    #[tokio::test]
    async fn test_create_user_fails_fast_without_network() {
        // No mocks mounted: a request would fail loudly
        let server = MockServer::start().await;
        let client = fast_client(&server);

        let mut user = sample_user();
        user.id = "123456789".to_string();

        let err = client.create_user(&user).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation { ref param, .. } if param.as_deref() == Some("id")));

        // The server saw nothing
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_user_fails_fast_on_bad_phone() {
        let server = MockServer::start().await;
        let client = fast_client(&server);

        let mut user = sample_user();
        user.phone_number = "0521234567".to_string();

        let err = client.create_user(&user).await.unwrap_err();
        assert!(
            matches!(err, ClientError::Validation { ref param, .. } if param.as_deref() == Some("phone_number"))
        );
    }

    #[tokio::test]
    async fn test_server_validation_error_maps_to_validation() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "error": {
                    "message": "name must be at least 2 characters long",
                    "type": "validation_error",
                    "param": "name"
                }
            })))
            .mount(&server)
            .await;

        let client = fast_client(&server);
        let mut user = sample_user();
        user.name = "J".to_string();

        let err = client.create_user(&user).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation { ref param, .. } if param.as_deref() == Some("name")));
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/123456782"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"message": "User not found", "type": "not_found_error"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = fast_client(&server);
        let err = client.get_user("123456782").await.unwrap_err();

        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_retried_until_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!(["123456782"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = fast_client(&server);
        let ids = client.list_users().await.unwrap();

        assert_eq!(ids, vec!["123456782".to_string()]);
    }

    #[tokio::test]
    async fn test_retries_exhausted_returns_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3) // initial attempt + 2 retries
            .mount(&server)
            .await;

        let client = fast_client(&server);
        let err = client.list_users().await.unwrap_err();

        assert!(matches!(err, ClientError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_login_stores_token_for_later_requests() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "test-token",
                "token_type": "bearer",
                "expires_at": "2024-01-01T01:00:00Z"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/users"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = fast_client(&server);
        client.login("admin", "secure_password").await.unwrap();

        let ids = client.list_users().await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_login_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Invalid username or password", "type": "authentication_error"}
            })))
            .mount(&server)
            .await;

        let mut client = fast_client(&server);
        let err = client.login("admin", "wrong").await.unwrap_err();

        assert!(matches!(err, ClientError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_list_users_detailed_sends_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users-detailed"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "5"))
            .and(query_param("search", "haifa"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "users": [],
                "total": 0,
                "page": 2,
                "per_page": 5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = fast_client(&server);
        let page = client
            .list_users_detailed(2, 5, Some("haifa"))
            .await
            .unwrap();

        assert_eq!(page.page, 2);
    }

    #[tokio::test]
    async fn test_update_requires_some_field() {
        let server = MockServer::start().await;
        let client = fast_client(&server);

        let err = client
            .update_user("123456782", &UserUpdate::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/users/123456782"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = fast_client(&server);
        client.delete_user("123456782").await.unwrap();
    }

    #[tokio::test]
    async fn test_create_many_collects_outcomes() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(user_response_body("123456782")),
            )
            .mount(&server)
            .await;

        let client = fast_client(&server);

        let mut invalid = sample_user();
        invalid.id = "1234567".to_string();

        let outcome = client
            .create_many(&[sample_user(), invalid])
            .await;

        assert_eq!(outcome.total(), 2);
        assert_eq!(outcome.succeeded.len(), 1);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].id, "1234567");
    }
}
