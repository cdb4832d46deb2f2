//! User service: validation plus repository orchestration

use std::sync::Arc;

use tracing::info;

use crate::domain::user::{
    validate_address, validate_id, validate_name, validate_phone, User, UserPage, UserQuery,
    UserRepository,
};
use crate::domain::DomainError;

const MAX_PER_PAGE: usize = 100;

/// Request for creating a new user record
#[derive(Debug, Clone)]
pub struct CreateUserRecord {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub address: String,
}

/// Request for partially updating a user record
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRecord {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

/// User service over a repository backend
#[derive(Debug)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new user service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a new user record
    ///
    /// Every field is validated before the repository is touched; the
    /// repository reports a conflict for duplicate IDs.
    pub async fn create(&self, request: CreateUserRecord) -> Result<User, DomainError> {
        let id = validate_id(&request.id).map_err(|e| DomainError::invalid_field("id", &e))?;
        let name =
            validate_name(&request.name).map_err(|e| DomainError::invalid_field("name", &e))?;
        let phone = validate_phone(&request.phone_number)
            .map_err(|e| DomainError::invalid_field("phone_number", &e))?;
        let address = validate_address(&request.address)
            .map_err(|e| DomainError::invalid_field("address", &e))?;

        let user = User::new(id, name, phone, address);
        let created = self.repository.create(user).await?;

        info!(id = created.id().as_str(), "User created");
        Ok(created)
    }

    /// Get a user by raw ID string
    ///
    /// An ID that does not validate cannot name an existing record, so it
    /// resolves to "not found" rather than a validation failure.
    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        match validate_id(id) {
            Ok(id) => self.repository.get(&id).await,
            Err(_) => Ok(None),
        }
    }

    /// List all user IDs
    pub async fn list_ids(&self) -> Result<Vec<String>, DomainError> {
        let ids = self.repository.list_ids().await?;
        Ok(ids.into_iter().map(String::from).collect())
    }

    /// Fetch a page of users with optional name/address search
    pub async fn search(
        &self,
        page: usize,
        per_page: usize,
        search: Option<String>,
    ) -> Result<UserPage, DomainError> {
        if page < 1 {
            return Err(DomainError::validation("page must be at least 1"));
        }

        if per_page < 1 || per_page > MAX_PER_PAGE {
            return Err(DomainError::validation(format!(
                "per_page must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }

        self.repository
            .search(&UserQuery {
                page,
                per_page,
                search,
            })
            .await
    }

    /// Partially update a user record
    ///
    /// Only the provided fields change; each one is re-validated.
    pub async fn update(&self, id: &str, request: UpdateUserRecord) -> Result<User, DomainError> {
        let parsed = validate_id(id)
            .map_err(|_| DomainError::not_found(format!("User '{}' not found", id)))?;

        let mut user = self
            .repository
            .get(&parsed)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        if let Some(name) = &request.name {
            let name = validate_name(name).map_err(|e| DomainError::invalid_field("name", &e))?;
            user.set_name(name);
        }

        if let Some(phone) = &request.phone_number {
            let phone = validate_phone(phone)
                .map_err(|e| DomainError::invalid_field("phone_number", &e))?;
            user.set_phone_number(phone);
        }

        if let Some(address) = &request.address {
            let address =
                validate_address(address).map_err(|e| DomainError::invalid_field("address", &e))?;
            user.set_address(address);
        }

        let updated = self.repository.update(&user).await?;

        info!(id = updated.id().as_str(), "User updated");
        Ok(updated)
    }

    /// Delete a user record, returning whether one existed
    pub async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let deleted = match validate_id(id) {
            Ok(id) => self.repository.delete(&id).await?,
            Err(_) => false,
        };

        if deleted {
            info!(id, "User deleted");
        }

        Ok(deleted)
    }

    /// Count all users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}
