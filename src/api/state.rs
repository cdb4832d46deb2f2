//! Application state for shared services

use std::sync::Arc;

use crate::domain::account::{Account, AccountRepository};
use crate::domain::user::{User, UserPage, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::account::{AccountService, PasswordHasher};
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::user::{CreateUserRecord, UpdateUserRecord, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        account_service: Arc<dyn AccountServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            user_service,
            account_service,
            jwt_service,
        }
    }
}

/// Trait for user record operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn create(&self, request: CreateUserRecord) -> Result<User, DomainError>;
    async fn get(&self, id: &str) -> Result<Option<User>, DomainError>;
    async fn list_ids(&self) -> Result<Vec<String>, DomainError>;
    async fn search(
        &self,
        page: usize,
        per_page: usize,
        search: Option<String>,
    ) -> Result<UserPage, DomainError>;
    async fn update(&self, id: &str, request: UpdateUserRecord) -> Result<User, DomainError>;
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Trait for operator account operations
#[async_trait::async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>, DomainError>;
    async fn get(&self, username: &str) -> Result<Option<Account>, DomainError>;
    async fn create(&self, username: &str, password: &str) -> Result<Account, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

// Implement the traits for the concrete services

#[async_trait::async_trait]
impl<R: UserRepository + 'static> UserServiceTrait for UserService<R> {
    async fn create(&self, request: CreateUserRecord) -> Result<User, DomainError> {
        UserService::create(self, request).await
    }

    async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn list_ids(&self) -> Result<Vec<String>, DomainError> {
        UserService::list_ids(self).await
    }

    async fn search(
        &self,
        page: usize,
        per_page: usize,
        search: Option<String>,
    ) -> Result<UserPage, DomainError> {
        UserService::search(self, page, per_page, search).await
    }

    async fn update(&self, id: &str, request: UpdateUserRecord) -> Result<User, DomainError> {
        UserService::update(self, id, request).await
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        UserService::delete(self, id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }
}

#[async_trait::async_trait]
impl<R: AccountRepository + 'static, H: PasswordHasher + 'static> AccountServiceTrait
    for AccountService<R, H>
{
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>, DomainError> {
        AccountService::authenticate(self, username, password).await
    }

    async fn get(&self, username: &str) -> Result<Option<Account>, DomainError> {
        AccountService::get(self, username).await
    }

    async fn create(&self, username: &str, password: &str) -> Result<Account, DomainError> {
        AccountService::create(self, username, password).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        AccountService::count(self).await
    }
}
