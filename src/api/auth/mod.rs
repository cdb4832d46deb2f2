//! Authentication API endpoints
//!
//! Login and account info endpoints for JWT-based authentication. Tokens
//! are optional on the user CRUD routes, so these endpoints only matter to
//! callers that want their requests attributed.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::RequireAccount;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(get_current_account))
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: String,
}

/// Account response (safe to expose)
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub username: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
}

impl AccountResponse {
    fn from_account(account: &crate::domain::account::Account) -> Self {
        Self {
            username: account.username().to_string(),
            created_at: account.created_at().to_rfc3339(),
            last_login_at: account.last_login_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// Login with username and password
///
/// POST /auth/login
///
/// Returns a Bearer token on successful authentication.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request(
            "Username and password are required",
        ));
    }

    let account = state
        .account_service
        .authenticate(&request.username, &request.password)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    let token = state
        .jwt_service
        .generate(&account)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let expires_at =
        Utc::now() + Duration::minutes(state.jwt_service.expiration_minutes() as i64);

    info!(username = account.username(), "Operator logged in");

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        expires_at: expires_at.to_rfc3339(),
    }))
}

/// Get the currently authenticated account
///
/// GET /auth/me
pub async fn get_current_account(
    RequireAccount(account): RequireAccount,
) -> Result<Json<AccountResponse>, ApiError> {
    Ok(Json(AccountResponse::from_account(&account)))
}
