//! User CRUD endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::OptionalAccount;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::User;
use crate::infrastructure::user::{CreateUserRecord, UpdateUserRecord};

/// Create the user routes
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_user_ids).post(create_user))
        .route("/users-detailed", get(list_users_detailed))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// User creation request
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub address: String,
}

/// Partial user update request
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

/// User representation in API responses
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub created_at: String,
    pub updated_at: String,
}

impl UserResponse {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id().as_str().to_string(),
            name: user.name().to_string(),
            phone_number: user.phone_number().as_str().to_string(),
            address: user.address().to_string(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}

/// Paginated user listing
#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// Query parameters for the detailed listing
#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    #[serde(default)]
    pub search: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    10
}

/// Create a new user
///
/// POST /users
///
/// Returns 201 with the stored record, 409 for a duplicate ID, 422 when a
/// field fails validation.
pub async fn create_user(
    State(state): State<AppState>,
    actor: OptionalAccount,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    info!(id = %request.id, actor = actor.actor(), "Creating user");

    let user = state
        .user_service
        .create(CreateUserRecord {
            id: request.id,
            name: request.name,
            phone_number: request.phone_number,
            address: request.address,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

/// Retrieve a user by ID
///
/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    actor: OptionalAccount,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    info!(%id, actor = actor.actor(), "Retrieving user");

    let user = state
        .user_service
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserResponse::from_user(&user)))
}

/// List all user IDs
///
/// GET /users
pub async fn list_user_ids(
    State(state): State<AppState>,
    actor: OptionalAccount,
) -> Result<Json<Vec<String>>, ApiError> {
    info!(actor = actor.actor(), "Listing user IDs");

    let ids = state.user_service.list_ids().await?;
    Ok(Json(ids))
}

/// List users with details, pagination, and optional search
///
/// GET /users-detailed?page=&per_page=&search=
pub async fn list_users_detailed(
    State(state): State<AppState>,
    actor: OptionalAccount,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<UserListResponse>, ApiError> {
    info!(
        page = params.page,
        per_page = params.per_page,
        search = params.search.as_deref().unwrap_or(""),
        actor = actor.actor(),
        "Listing users"
    );

    let page = state
        .user_service
        .search(params.page, params.per_page, params.search)
        .await?;

    Ok(Json(UserListResponse {
        users: page.users.iter().map(UserResponse::from_user).collect(),
        total: page.total,
        page: params.page,
        per_page: params.per_page,
    }))
}

/// Partially update a user
///
/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    actor: OptionalAccount,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    info!(%id, actor = actor.actor(), "Updating user");

    let user = state
        .user_service
        .update(
            &id,
            UpdateUserRecord {
                name: request.name,
                phone_number: request.phone_number,
                address: request.address,
            },
        )
        .await?;

    Ok(Json(UserResponse::from_user(&user)))
}

/// Delete a user
///
/// DELETE /users/{id}
///
/// Returns 204 on success, 404 when no record exists.
pub async fn delete_user(
    State(state): State<AppState>,
    actor: OptionalAccount,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!(%id, actor = actor.actor(), "Deleting user");

    let deleted = state.user_service.delete(&id).await?;

    if !deleted {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
